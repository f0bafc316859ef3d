//! x86-64 architecture-specific components.
//!
//! This module contains all x86-64 specific code:
//! - Physical register naming for logical slots
//! - GNU assembler text emission
//! - Instruction encoding and decoding using iced-x86

pub mod disasm;
pub mod encoder;
pub mod gas;
pub mod registers;

pub use disasm::{disassemble, Record};
pub use encoder::MaxTreeEncoder;
pub use registers::{RegId, RegisterMap};

/// How a per-N block is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Loads and reduction only; the result stays in the slot 0 register.
    #[default]
    Block,
    /// Block followed by a move of the result into `xmm0` and `ret`.
    Function,
}
