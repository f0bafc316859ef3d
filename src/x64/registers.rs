//! Physical register naming for x86-64.
//!
//! Logical slots are mapped onto consecutive XMM registers starting at a
//! configurable base. The input array pointer and the scratch register used to
//! materialise `-inf` are general purpose registers, identified by their
//! hardware number (`rax` = 0 ... `r15` = 15).

use crate::core::{GenError, GenResult, MaxTree, Slot};
use iced_x86::code_asm::*;

/// Hardware register number within a bank.
pub type RegId = u8;

/// XMM registers addressable with a VEX prefix.
pub const XMM_COUNT: RegId = 16;

/// Size of one input element in bytes.
pub const ELEMENT_SIZE: i32 = 8;

/// General purpose register ids.
pub mod gpr {
    use super::RegId;

    pub const RAX: RegId = 0;
    pub const RCX: RegId = 1;
    pub const RDX: RegId = 2;
    pub const RSI: RegId = 6;
    pub const RDI: RegId = 7;
}

const GP64_REGS: [AsmRegister64; 16] = [
    rax, rcx, rdx, rbx, rsp, rbp, rsi, rdi,
    r8, r9, r10, r11, r12, r13, r14, r15,
];

const GP64_NAMES: [&str; 16] = [
    "rax", "rcx", "rdx", "rbx", "rsp", "rbp", "rsi", "rdi",
    "r8", "r9", "r10", "r11", "r12", "r13", "r14", "r15",
];

const XMM_REGS: [AsmRegisterXmm; 16] = [
    xmm0, xmm1, xmm2, xmm3, xmm4, xmm5, xmm6, xmm7,
    xmm8, xmm9, xmm10, xmm11, xmm12, xmm13, xmm14, xmm15,
];

/// XMM register receiving a function's `f64` return value.
pub const RETURN_XMM: RegId = 0;

/// Mapping from logical slots to physical registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    xmm_base: RegId,
    input: RegId,
    scratch: RegId,
}

impl Default for RegisterMap {
    /// Slots start at `xmm3`, the input array is in `rdi` (first System V
    /// argument) and `rcx` is free for scratch use.
    fn default() -> Self {
        Self {
            xmm_base: 3,
            input: gpr::RDI,
            scratch: gpr::RCX,
        }
    }
}

impl RegisterMap {
    /// Create a mapping placing slot 0 in `xmm<xmm_base>`.
    pub fn new(xmm_base: RegId) -> GenResult<Self> {
        if xmm_base >= XMM_COUNT {
            return Err(GenError::InvalidRegister { id: xmm_base });
        }
        Ok(Self {
            xmm_base,
            ..Self::default()
        })
    }

    /// Use another general purpose register as the input array pointer.
    pub fn with_input(mut self, id: RegId) -> GenResult<Self> {
        self.input = check_gpr(id)?;
        Ok(self)
    }

    /// Use another general purpose register for scratch values.
    pub fn with_scratch(mut self, id: RegId) -> GenResult<Self> {
        self.scratch = check_gpr(id)?;
        Ok(self)
    }

    pub fn xmm_base(&self) -> RegId {
        self.xmm_base
    }

    pub fn input(&self) -> RegId {
        self.input
    }

    pub fn scratch(&self) -> RegId {
        self.scratch
    }

    /// XMM register number holding `slot`.
    pub fn xmm_id(&self, slot: Slot) -> GenResult<RegId> {
        let id = self.xmm_base as usize + slot;
        if id >= XMM_COUNT as usize {
            return Err(GenError::SlotOutOfRange {
                slot,
                xmm_base: self.xmm_base,
            });
        }
        Ok(id as RegId)
    }

    /// Verify that every slot of `tree` has a register.
    pub fn check(&self, tree: &MaxTree) -> GenResult<()> {
        self.xmm_id(tree.max_slot()).map(|_| ())
    }

    pub fn xmm(&self, slot: Slot) -> GenResult<AsmRegisterXmm> {
        Ok(XMM_REGS[self.xmm_id(slot)? as usize])
    }

    pub fn input_reg(&self) -> AsmRegister64 {
        GP64_REGS[self.input as usize]
    }

    pub fn scratch_reg(&self) -> AsmRegister64 {
        GP64_REGS[self.scratch as usize]
    }

    /// AT&T name of the register holding `slot`, e.g. `%xmm3`.
    pub fn xmm_name(&self, slot: Slot) -> GenResult<String> {
        Ok(xmm_name(self.xmm_id(slot)?))
    }

    pub fn input_name(&self) -> String {
        format!("%{}", GP64_NAMES[self.input as usize])
    }

    pub fn scratch_name(&self) -> String {
        format!("%{}", GP64_NAMES[self.scratch as usize])
    }
}

/// AT&T name of an XMM register.
pub fn xmm_name(id: RegId) -> String {
    format!("%xmm{id}")
}

/// Physical XMM register by number.
pub fn xmm_reg(id: RegId) -> GenResult<AsmRegisterXmm> {
    XMM_REGS
        .get(id as usize)
        .copied()
        .ok_or(GenError::InvalidRegister { id })
}

fn check_gpr(id: RegId) -> GenResult<RegId> {
    if (id as usize) < GP64_REGS.len() {
        Ok(id)
    } else {
        Err(GenError::InvalidRegister { id })
    }
}
