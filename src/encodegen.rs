// This module drives code generation for a whole range of input counts. For every N in the
// configured range it plans a MaxTree and renders it in the requested form: GNU assembler
// sections (one `.section CODE_MAX_OF_<N>` each), machine-code blocks encoded in process,
// a C header of byte arrays with disassembly comments, or an ELF relocatable object. The
// GenConfig struct carries everything that is configurable: the N range, the physical
// register mapping and the block framing. All outputs are deterministic for a given config.

//! Encoding snippet generator.
//!
//! Produces the per-N code blocks of the max kernel and renders them in one
//! of the supported output formats.

use crate::core::{GenError, GenResult, MaxTree};
use crate::x64::{gas, Framing, MaxTreeEncoder, RegisterMap};
use crate::{elf, header};
use clap::ValueEnum;
use std::ops::RangeInclusive;
use std::path::Path;

/// Largest input count generated by default.
pub const DEFAULT_MAX_INPUTS: usize = 10;

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Input counts to generate blocks for.
    pub range: RangeInclusive<usize>,
    pub registers: RegisterMap,
    pub framing: Framing,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            range: 0..=DEFAULT_MAX_INPUTS,
            registers: RegisterMap::default(),
            framing: Framing::Block,
        }
    }
}

impl GenConfig {
    /// Config for input counts `min..=max`.
    pub fn with_range(mut self, min: usize, max: usize) -> GenResult<Self> {
        if min > max {
            return Err(GenError::InvalidRange { min, max });
        }
        self.range = min..=max;
        Ok(self)
    }

    pub fn with_registers(mut self, registers: RegisterMap) -> Self {
        self.registers = registers;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// GNU assembler text, one section per input count
    Asm,
    /// C header with one byte array per input count
    Header,
    /// ELF relocatable object, one section per input count
    Object,
}

impl Emit {
    pub fn name(&self) -> &'static str {
        match self {
            Emit::Asm => "asm",
            Emit::Header => "header",
            Emit::Object => "object",
        }
    }

    /// Whether the output is binary and cannot go to a terminal.
    pub fn is_binary(&self) -> bool {
        matches!(self, Emit::Object)
    }
}

/// Fail when binary output would go to stdout.
pub fn check_output(emit: Emit, out: Option<&Path>) -> GenResult<()> {
    if emit.is_binary() && out.is_none() {
        return Err(GenError::MissingOutput { emit: emit.name() });
    }
    Ok(())
}

/// Include guard: explicit `guard`, else derived from `out`, else the default.
pub fn resolve_guard(guard: Option<&str>, out: Option<&Path>) -> String {
    match (guard, out) {
        (Some(guard), _) => guard.to_string(),
        (None, Some(path)) => header::guard_name(&path.to_string_lossy()),
        (None, None) => header::DEFAULT_GUARD.to_string(),
    }
}

/// Machine code for one input count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub name: String,
    pub inputs: usize,
    pub code: Vec<u8>,
}

/// Section and constant name for the block reducing `n` inputs.
pub fn section_name(n: usize) -> String {
    format!("CODE_MAX_OF_{n}")
}

/// Plan every input count of the configured range, in ascending order.
pub fn plan_range(config: &GenConfig) -> Vec<MaxTree> {
    config.range.clone().map(MaxTree::plan).collect()
}

/// GNU assembler text for the configured range.
pub fn generate_asm(config: &GenConfig) -> GenResult<String> {
    let mut out = String::new();
    for tree in plan_range(config) {
        out.push_str(&gas::render_section(
            &section_name(tree.inputs()),
            &tree,
            &config.registers,
            config.framing,
        )?);
    }
    Ok(out)
}

/// Encoded machine-code blocks for the configured range.
pub fn generate_blocks(config: &GenConfig) -> GenResult<Vec<CodeBlock>> {
    let mut encoder = MaxTreeEncoder::new(config.registers)?;
    let mut blocks = Vec::new();
    for tree in plan_range(config) {
        blocks.push(CodeBlock {
            name: section_name(tree.inputs()),
            inputs: tree.inputs(),
            code: encoder.encode(&tree, config.framing)?,
        });
    }
    Ok(blocks)
}

/// C header for the configured range.
pub fn generate_header(config: &GenConfig, guard: &str) -> GenResult<String> {
    header::render_header(guard, &generate_blocks(config)?)
}

/// ELF object for the configured range.
pub fn generate_object(config: &GenConfig) -> GenResult<Vec<u8>> {
    elf::write_object(&generate_blocks(config)?, config.framing)
}

/// Generate `emit` output for `config`. `guard` is only used for headers.
pub fn generate(config: &GenConfig, emit: Emit, guard: &str) -> GenResult<Vec<u8>> {
    log::info!(
        "generating {} for inputs {}..={} (xmm base {}, {:?})",
        emit.name(),
        config.range.start(),
        config.range.end(),
        config.registers.xmm_base(),
        config.framing
    );
    match emit {
        Emit::Asm => generate_asm(config).map(String::into_bytes),
        Emit::Header => generate_header(config, guard).map(String::into_bytes),
        Emit::Object => generate_object(config),
    }
}
