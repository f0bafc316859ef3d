//! Machine code to per-instruction records.
//!
//! Uses the iced-x86 decoder and GAS formatter so the comments in generated
//! headers read like `objdump -d` output (`vmovsd 0x8(%rdi),%xmm4`).

use crate::core::{GenError, GenResult};
use iced_x86::{Decoder, DecoderOptions, Formatter, GasFormatter, Instruction};

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub bytes: Vec<u8>,
    pub text: String,
}

fn gas_formatter() -> GasFormatter {
    let mut formatter = GasFormatter::new();
    let options = formatter.options_mut();
    options.set_uppercase_hex(false);
    options.set_small_hex_numbers_in_decimal(false);
    // objdump pads mnemonics to six characters
    options.set_first_operand_char_index(7);
    formatter
}

/// Split 64-bit `code` into instructions.
pub fn disassemble(code: &[u8]) -> GenResult<Vec<Record>> {
    let mut decoder = Decoder::with_ip(64, code, 0, DecoderOptions::NONE);
    let mut formatter = gas_formatter();
    let mut instruction = Instruction::default();
    let mut records = Vec::new();

    while decoder.can_decode() {
        let offset = decoder.position();
        decoder.decode_out(&mut instruction);
        if instruction.is_invalid() {
            return Err(GenError::Decode { offset });
        }

        let mut text = String::new();
        formatter.format(&instruction, &mut text);
        let end = offset + instruction.len();
        records.push(Record {
            bytes: code[offset..end].to_vec(),
            text: text.trim_end().to_string(),
        });
    }

    log::trace!("disassembled {} bytes into {} records", code.len(), records.len());
    Ok(records)
}
