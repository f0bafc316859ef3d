//! GNU assembler (AT&T syntax) text emission.
//!
//! Each plan becomes one `.section` named after its input count: the loads,
//! an empty line, the reduction (or the `-inf` initialisation), and a closing
//! empty line. The text is what `as` expects for the per-N blocks that are
//! later converted into embeddable byte arrays.

use super::registers::{xmm_name, RegisterMap, ELEMENT_SIZE, RETURN_XMM};
use super::Framing;
use crate::core::{GenResult, MaxTree, Op, NEG_INF_BITS, RESULT_SLOT};

/// Text of a single operation; `-inf` needs two instructions.
pub fn op_lines(op: &Op, map: &RegisterMap) -> GenResult<Vec<String>> {
    let lines = match *op {
        Op::NegInf { dst } => vec![
            format!("movabs ${:#018x},{}", NEG_INF_BITS, map.scratch_name()),
            format!("vmovq  {},{}", map.scratch_name(), map.xmm_name(dst)?),
        ],
        Op::Load { index, dst } => vec![format!(
            "vmovsd 0x{:02x}({}),{}",
            ELEMENT_SIZE as usize * index,
            map.input_name(),
            map.xmm_name(dst)?
        )],
        Op::Max { dst, lhs, rhs } => vec![format!(
            "vmaxsd {},{},{}",
            map.xmm_name(rhs)?,
            map.xmm_name(lhs)?,
            map.xmm_name(dst)?
        )],
    };
    Ok(lines)
}

/// Render the section for `tree` under `name`.
pub fn render_section(
    name: &str,
    tree: &MaxTree,
    map: &RegisterMap,
    framing: Framing,
) -> GenResult<String> {
    map.check(tree)?;

    let mut loads = Vec::new();
    let mut body = Vec::new();
    for op in tree.ops() {
        let lines = op_lines(op, map)?;
        match op {
            Op::Load { .. } => loads.extend(lines),
            _ => body.extend(lines),
        }
    }
    if framing == Framing::Function {
        body.push(format!(
            "vmovapd {},{}",
            map.xmm_name(RESULT_SLOT)?,
            xmm_name(RETURN_XMM)
        ));
        body.push("ret".to_string());
    }

    let mut out = format!(".section {name}\n");
    for line in &loads {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    for line in &body {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    Ok(out)
}
