//! fmaxgen - tournament max-reduction code generator.
//!
//! Generates x86-64 AVX code computing the maximum of `n` doubles read from
//! the array in `rdi`, for every `n` in a range (0..=10 by default). Each
//! block loads its inputs into consecutive XMM registers and merges them
//! pairwise, smallest slots first, until the result is in slot 0. An empty
//! input yields negative infinity.
//!
//! # Primary Usage
//!
//! ```
//! use fmaxgen::core::MaxTree;
//! use fmaxgen::encodegen::{generate_asm, GenConfig};
//!
//! let tree = MaxTree::plan(5);
//! assert_eq!(tree.max_count(), 4);
//! assert_eq!(tree.rounds(), 3);
//!
//! let text = generate_asm(&GenConfig::default()).unwrap();
//! assert!(text.starts_with(".section CODE_MAX_OF_0\n"));
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Target independent planning and errors
//! - [`x64`] - Register mapping, GAS text, iced-x86 encoding and decoding
//! - [`header`] - C header output
//! - [`elf`] - ELF object output
//! - [`encodegen`] - Per-range driver and configuration

pub mod core;
pub mod elf;
pub mod encodegen;
pub mod header;
pub mod x64;

pub use crate::core::{GenError, GenResult, MaxTree, Op, Slot};
pub use crate::encodegen::{CodeBlock, Emit, GenConfig};
pub use crate::x64::{Framing, RegisterMap};
