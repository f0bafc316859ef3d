//! C header rendering.
//!
//! Every code block becomes a `const unsigned char` array with one line per
//! instruction and the instruction text as a trailing comment, wrapped in an
//! include guard derived from the output file name.

use crate::core::GenResult;
use crate::encodegen::CodeBlock;
use crate::x64::{disassemble, Record};

/// Guard used when no output file name is known.
pub const DEFAULT_GUARD: &str = "CODE_MAX_TREE_H";

/// C identifier for a section name.
pub fn constant_name(section: &str) -> String {
    section.to_uppercase()
}

/// Include guard for `file_name`: letters upper-cased, everything else `_`.
pub fn guard_name(file_name: &str) -> String {
    let mut guard = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        if c.is_alphabetic() {
            guard.extend(c.to_uppercase());
        } else {
            guard.push('_');
        }
    }
    guard
}

/// Lines of one array definition, ending with an empty line.
pub fn render_definition(name: &str, records: &[Record]) -> Vec<String> {
    let mut lines = Vec::with_capacity(records.len() + 3);
    lines.push(format!("const unsigned char {name}[] = {{"));

    for (i, record) in records.iter().enumerate() {
        let is_last = i + 1 == records.len();
        let mut line = record
            .bytes
            .iter()
            .map(|b| format!("{b:#04x}"))
            .collect::<Vec<_>>()
            .join(", ");
        if !is_last {
            line.push(',');
        }
        if !record.text.is_empty() {
            line.push_str(" //");
            line.push_str(&record.text);
        }
        lines.push(format!("\t{line}"));
    }

    lines.push("};".to_string());
    lines.push(String::new());
    lines
}

/// Render a complete header for `blocks`.
pub fn render_header(guard: &str, blocks: &[CodeBlock]) -> GenResult<String> {
    let mut out = format!("\n#ifndef {guard}\n#define {guard} 1\n\n\n");
    for block in blocks {
        let records = disassemble(&block.code)?;
        for line in render_definition(&constant_name(&block.name), &records) {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.push_str("\n\n#endif\n");
    Ok(out)
}
