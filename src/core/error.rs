// This module defines the error types for fmaxgen using the thiserror crate. The tournament
// planner itself is a total function and never fails; GenError covers everything around it:
// slots that do not map onto an encodable XMM register, invalid general purpose register
// ids, iced-x86 assembler and decoder failures, ELF object writing failures, malformed
// N ranges and output selection problems, and plain I/O errors from the command line.
// GenResult<T> is the convenience alias used across the crate.

//! Error types for fmaxgen.

use thiserror::Error;

/// Main error type for code generation.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Slot {slot} does not fit in a VEX-encodable XMM register (xmm base {xmm_base})")]
    SlotOutOfRange {
        slot: usize,
        xmm_base: u8,
    },

    #[error("Invalid register id: {id}")]
    InvalidRegister {
        id: u8,
    },

    #[error("Encoding failed: {reason}")]
    Encoding {
        reason: String,
    },

    #[error("Undecodable instruction at offset {offset:#x}")]
    Decode {
        offset: usize,
    },

    #[error("Object file generation failed: {reason}")]
    Object {
        reason: String,
    },

    #[error("Invalid input range: {min} > {max}")]
    InvalidRange {
        min: usize,
        max: usize,
    },

    #[error("Output format {emit} requires an output file")]
    MissingOutput {
        emit: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;
