// This module turns MaxTree plans into real x86-64 machine code using iced-x86's
// CodeAssembler. MaxTreeEncoder owns a RegisterMap and emits, per logical operation, the
// AVX scalar instruction the GNU assembler text would produce: vmovsd for loads from the
// input array, vmaxsd for merges, and a movabs/vmovq pair materialising negative infinity
// for empty inputs. With Function framing the result is moved into xmm0 and followed by a
// ret so the block is a complete `double f(const double *)`. The encoded bytes are what the
// header and ELF writers consume, which removes the need for an external assembler.

//! x86-64 instruction encoding using iced-x86.

use super::registers::{xmm_reg, RegisterMap, ELEMENT_SIZE, RETURN_XMM};
use super::Framing;
use crate::core::{GenError, GenResult, MaxTree, Op, Slot, NEG_INF_BITS, RESULT_SLOT};
use iced_x86::code_asm::*;
use iced_x86::IcedError;

fn asm_err(e: IcedError) -> GenError {
    GenError::Encoding {
        reason: e.to_string(),
    }
}

/// Encoder for reduction plans.
pub struct MaxTreeEncoder {
    /// Code assembler for generating instructions.
    assembler: CodeAssembler,
    map: RegisterMap,
}

impl MaxTreeEncoder {
    /// Create a new encoder using `map` for register naming.
    pub fn new(map: RegisterMap) -> GenResult<Self> {
        Ok(Self {
            assembler: CodeAssembler::new(64).map_err(asm_err)?,
            map,
        })
    }

    pub fn registers(&self) -> &RegisterMap {
        &self.map
    }

    /// Emit VMOVSD - load input `index` into `dst`.
    pub fn load(&mut self, index: usize, dst: Slot) -> GenResult<()> {
        let dst_reg = self.map.xmm(dst)?;
        let base = self.map.input_reg();

        if index == 0 {
            self.assembler
                .vmovsd(dst_reg, qword_ptr(base))
                .map_err(asm_err)?;
        } else {
            let offset = i32::try_from(index)
                .ok()
                .and_then(|i| i.checked_mul(ELEMENT_SIZE))
                .ok_or_else(|| GenError::Encoding {
                    reason: format!("input offset of element {index} exceeds 32 bits"),
                })?;
            self.assembler
                .vmovsd(dst_reg, qword_ptr(base + offset))
                .map_err(asm_err)?;
        }
        Ok(())
    }

    /// Emit VMAXSD - `dst = max(lhs, rhs)`.
    pub fn max(&mut self, dst: Slot, lhs: Slot, rhs: Slot) -> GenResult<()> {
        let dst_reg = self.map.xmm(dst)?;
        let lhs_reg = self.map.xmm(lhs)?;
        let rhs_reg = self.map.xmm(rhs)?;

        self.assembler
            .vmaxsd(dst_reg, lhs_reg, rhs_reg)
            .map_err(asm_err)?;
        Ok(())
    }

    /// Emit MOVABS + VMOVQ - `dst = -inf` through the scratch register.
    pub fn neg_inf(&mut self, dst: Slot) -> GenResult<()> {
        let dst_reg = self.map.xmm(dst)?;
        let scratch = self.map.scratch_reg();

        self.assembler
            .mov(scratch, NEG_INF_BITS)
            .map_err(asm_err)?;
        self.assembler.vmovq(dst_reg, scratch).map_err(asm_err)?;
        Ok(())
    }

    /// Emit the return sequence: result into `xmm0`, then RET.
    pub fn emit_epilogue(&mut self) -> GenResult<()> {
        let result = self.map.xmm(RESULT_SLOT)?;
        self.assembler
            .vmovapd(xmm_reg(RETURN_XMM)?, result)
            .map_err(asm_err)?;
        self.assembler.ret().map_err(asm_err)?;
        Ok(())
    }

    /// Emit a single logical operation.
    pub fn emit(&mut self, op: &Op) -> GenResult<()> {
        match *op {
            Op::NegInf { dst } => self.neg_inf(dst),
            Op::Load { index, dst } => self.load(index, dst),
            Op::Max { dst, lhs, rhs } => self.max(dst, lhs, rhs),
        }
    }

    /// Generate the final machine code bytes and reset the encoder.
    pub fn finalize(&mut self) -> GenResult<Vec<u8>> {
        let code = self.assembler.assemble(0).map_err(asm_err)?;
        self.assembler = CodeAssembler::new(64).map_err(asm_err)?;
        Ok(code)
    }

    /// Encode a whole plan.
    pub fn encode(&mut self, tree: &MaxTree, framing: Framing) -> GenResult<Vec<u8>> {
        self.map.check(tree)?;

        for op in tree.ops() {
            self.emit(op)?;
        }
        if framing == Framing::Function {
            self.emit_epilogue()?;
        }

        let code = self.finalize()?;
        log::debug!(
            "encoded {} inputs ({:?}): {} instructions, {} bytes",
            tree.inputs(),
            framing,
            tree.ops().len(),
            code.len()
        );
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> MaxTreeEncoder {
        MaxTreeEncoder::new(RegisterMap::default()).unwrap()
    }

    #[test]
    fn test_load_encoding() {
        let mut encoder = encoder();
        encoder.load(0, 0).unwrap();
        // vmovsd (%rdi),%xmm3
        assert_eq!(encoder.finalize().unwrap(), vec![0xc5, 0xfb, 0x10, 0x1f]);

        encoder.load(1, 1).unwrap();
        // vmovsd 0x8(%rdi),%xmm4
        assert_eq!(encoder.finalize().unwrap(), vec![0xc5, 0xfb, 0x10, 0x67, 0x08]);
    }

    #[test]
    fn test_max_encoding() {
        let mut encoder = encoder();
        encoder.max(0, 0, 1).unwrap();
        // vmaxsd %xmm4,%xmm3,%xmm3
        assert_eq!(encoder.finalize().unwrap(), vec![0xc5, 0xe3, 0x5f, 0xdc]);
    }

    #[test]
    fn test_neg_inf_encoding() {
        let mut encoder = encoder();
        encoder.neg_inf(0).unwrap();
        let code = encoder.finalize().unwrap();
        // movabs $0xfff0000000000000,%rcx
        assert_eq!(
            &code[..10],
            &[0x48, 0xb9, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xf0, 0xff]
        );
        // vmovq %rcx,%xmm3
        assert_eq!(&code[10..], &[0xc4, 0xe1, 0xf9, 0x6e, 0xd9]);
    }

    #[test]
    fn test_function_epilogue() {
        let mut encoder = encoder();
        let code = encoder.encode(&MaxTree::plan(1), Framing::Function).unwrap();
        // vmovsd (%rdi),%xmm3; vmovapd %xmm3,%xmm0; ret
        assert_eq!(
            code,
            vec![0xc5, 0xfb, 0x10, 0x1f, 0xc5, 0xf9, 0x28, 0xc3, 0xc3]
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let mut encoder = encoder();
        for n in 0..=10 {
            let tree = MaxTree::plan(n);
            let first = encoder.encode(&tree, Framing::Block).unwrap();
            let second = encoder.encode(&tree, Framing::Block).unwrap();
            assert!(!first.is_empty());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_rejects_unmappable_plan() {
        let mut encoder = encoder();
        assert!(matches!(
            encoder.encode(&MaxTree::plan(14), Framing::Block),
            Err(GenError::SlotOutOfRange { .. })
        ));
    }
}
