//! ELF relocatable object output.
//!
//! Mirrors what `as` produces for the GNU assembler text: one executable
//! section per code block, named after the block. Function-framed blocks also
//! get a global function symbol so the object can be linked directly.

use crate::core::{GenError, GenResult};
use crate::encodegen::CodeBlock;
use crate::x64::Framing;
use object::write::{Object, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};

/// Alignment of every code section.
pub const SECTION_ALIGN: u64 = 16;

/// Symbol name for a function-framed block.
pub fn symbol_name(block: &CodeBlock) -> String {
    block.name.to_lowercase()
}

/// Build an ELF64 x86-64 object holding `blocks`.
pub fn write_object(blocks: &[CodeBlock], framing: Framing) -> GenResult<Vec<u8>> {
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);

    for block in blocks {
        let section = obj.add_section(
            Vec::new(),
            block.name.clone().into_bytes(),
            SectionKind::Text,
        );
        let offset = obj.append_section_data(section, &block.code, SECTION_ALIGN);

        if framing == Framing::Function {
            obj.add_symbol(Symbol {
                name: symbol_name(block).into_bytes(),
                value: offset,
                size: block.code.len() as u64,
                kind: SymbolKind::Text,
                scope: SymbolScope::Linkage,
                weak: false,
                section: SymbolSection::Section(section),
                flags: SymbolFlags::None,
            });
        }
    }

    let bytes = obj.write().map_err(|e| GenError::Object {
        reason: e.to_string(),
    })?;
    log::debug!("object: {} sections, {} bytes", blocks.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use object::{File, Object as _, ObjectSection as _, ObjectSymbol as _};

    fn block(n: usize, code: &[u8]) -> CodeBlock {
        CodeBlock {
            name: format!("CODE_MAX_OF_{n}"),
            inputs: n,
            code: code.to_vec(),
        }
    }

    #[test]
    fn test_sections_per_block() {
        let blocks = [block(1, &[0xc5, 0xfb, 0x10, 0x1f]), block(7, &[0x90])];
        let bytes = write_object(&blocks, Framing::Block).unwrap();
        let file = File::parse(&*bytes).unwrap();

        let section = file.section_by_name("CODE_MAX_OF_1").unwrap();
        assert_eq!(section.data().unwrap(), &[0xc5, 0xfb, 0x10, 0x1f]);
        assert_eq!(file.section_by_name("CODE_MAX_OF_7").unwrap().data().unwrap(), &[0x90]);
        assert!(file.symbol_by_name("code_max_of_1").is_none());
    }

    #[test]
    fn test_function_symbols() {
        let blocks = [block(1, &[0xc5, 0xfb, 0x10, 0x1f, 0xc5, 0xf9, 0x28, 0xc3, 0xc3])];
        let bytes = write_object(&blocks, Framing::Function).unwrap();
        let file = File::parse(&*bytes).unwrap();

        let symbol = file.symbol_by_name("code_max_of_1").unwrap();
        assert_eq!(symbol.size(), 9);
        assert_eq!(symbol.kind(), SymbolKind::Text);
        assert!(symbol.is_global());
    }
}
