// This module implements the tournament reduction planner at the heart of fmaxgen. Given
// the number N of f64 inputs it assigns input i to logical slot i, emits one load per input
// and then reduces the slots pairwise, round by round, always merging the two smallest
// live slots first, until only slot 0 remains. The result is a MaxTree: an ordered list of
// logical operations (negative infinity initialisation, loads, max merges) plus the number
// of rounds. Physical register naming lives in the x64 module; nothing here knows about
// XMM registers. MaxTree::evaluate interprets a plan on concrete inputs with vmaxsd
// semantics so that generated sequences can be checked without executing machine code.

//! Tournament max-reduction planning.
//!
//! The planner is a pure, total function of the input count. Slot identifiers
//! are logical (`0..n`), and the pairing order is canonical: within every round
//! the two smallest live slots are merged first and an odd slot carries over
//! untouched. Plans are therefore reproducible bit for bit.

use std::collections::BTreeSet;

/// Logical storage slot. Slot `i` initially holds input `i`.
pub type Slot = usize;

/// Slot that holds the final result of every plan.
pub const RESULT_SLOT: Slot = 0;

/// IEEE-754 bit pattern of negative infinity, the max of an empty set.
pub const NEG_INF_BITS: u64 = 0xfff0_0000_0000_0000;

/// A single logical operation of a reduction plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `dst = -inf`. Only emitted for empty inputs.
    NegInf { dst: Slot },
    /// `dst = input[index]`.
    Load { index: usize, dst: Slot },
    /// `dst = max(lhs, rhs)`, overwriting `dst`.
    Max { dst: Slot, lhs: Slot, rhs: Slot },
}

impl Op {
    /// Slot written by this operation.
    pub fn dst(&self) -> Slot {
        match *self {
            Op::NegInf { dst } | Op::Load { dst, .. } | Op::Max { dst, .. } => dst,
        }
    }
}

/// Set of slots still live in one round of the reduction.
///
/// Backed by an ordered set so the smallest slot is always extracted first,
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    live: BTreeSet<Slot>,
}

impl Generation {
    /// Generation holding every slot `0..n`.
    pub fn full(n: usize) -> Self {
        Self {
            live: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn insert(&mut self, slot: Slot) {
        self.live.insert(slot);
    }

    /// Remove and return the smallest live slot.
    pub fn pop_min(&mut self) -> Option<Slot> {
        self.live.pop_first()
    }

    /// Live slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.live.iter().copied()
    }

    /// Run one round: merge the smallest pairs and return the survivors.
    fn reduce(mut self, ops: &mut Vec<Op>) -> Generation {
        let mut next = Generation::default();
        while let Some(a) = self.pop_min() {
            match self.pop_min() {
                Some(b) => {
                    log::trace!("  max: slot {} <- max(slot {}, slot {})", a, a, b);
                    ops.push(Op::Max { dst: a, lhs: a, rhs: b });
                    next.insert(a);
                }
                None => {
                    log::trace!("  carry: slot {}", a);
                    next.insert(a);
                }
            }
        }
        next
    }
}

/// Complete reduction plan for a fixed number of inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxTree {
    inputs: usize,
    ops: Vec<Op>,
    rounds: usize,
}

impl MaxTree {
    /// Plan the reduction of `n` inputs.
    pub fn plan(n: usize) -> Self {
        if n == 0 {
            log::debug!("max tree: 0 inputs, -inf");
            return Self {
                inputs: 0,
                ops: vec![Op::NegInf { dst: RESULT_SLOT }],
                rounds: 0,
            };
        }

        let mut ops: Vec<Op> = (0..n).map(|i| Op::Load { index: i, dst: i }).collect();

        let mut generation = Generation::full(n);
        let mut rounds = 0;
        while generation.len() > 1 {
            rounds += 1;
            log::trace!(
                "round {}: live {:?}",
                rounds,
                generation.slots().collect::<Vec<_>>()
            );
            generation = generation.reduce(&mut ops);
        }

        let tree = Self { inputs: n, ops, rounds };
        log::debug!(
            "max tree: {} inputs, {} loads, {} max ops, {} rounds",
            n,
            tree.load_count(),
            tree.max_count(),
            rounds
        );
        tree
    }

    /// Number of inputs this plan reduces.
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// All operations in emission order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn loads(&self) -> impl Iterator<Item = &Op> + '_ {
        self.ops.iter().filter(|op| matches!(op, Op::Load { .. }))
    }

    pub fn max_ops(&self) -> impl Iterator<Item = &Op> + '_ {
        self.ops.iter().filter(|op| matches!(op, Op::Max { .. }))
    }

    pub fn load_count(&self) -> usize {
        self.loads().count()
    }

    pub fn max_count(&self) -> usize {
        self.max_ops().count()
    }

    /// Number of tournament rounds, `ceil(log2(n))` for `n >= 1`.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn result_slot(&self) -> Slot {
        RESULT_SLOT
    }

    /// Highest slot referenced by the plan.
    pub fn max_slot(&self) -> Slot {
        self.inputs.saturating_sub(1)
    }

    /// Interpret the plan on `inputs` and return the value left in the result slot.
    ///
    /// Max follows `vmaxsd`: `lhs > rhs ? lhs : rhs`, so a NaN in either
    /// operand yields `rhs`. Returns `None` when fewer than `inputs()` values
    /// are supplied.
    pub fn evaluate(&self, inputs: &[f64]) -> Option<f64> {
        if inputs.len() < self.inputs {
            return None;
        }

        let mut slots = vec![f64::NAN; self.inputs.max(1)];
        for op in &self.ops {
            match *op {
                Op::NegInf { dst } => slots[dst] = f64::from_bits(NEG_INF_BITS),
                Op::Load { index, dst } => slots[dst] = inputs[index],
                Op::Max { dst, lhs, rhs } => {
                    slots[dst] = if slots[lhs] > slots[rhs] {
                        slots[lhs]
                    } else {
                        slots[rhs]
                    }
                }
            }
        }
        Some(slots[RESULT_SLOT])
    }
}
