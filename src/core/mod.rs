// This module is the target independent half of fmaxgen. It exports the tournament planner
// (logical slots, generations, MaxTree operation plans and their reference interpreter) and
// the crate wide error type. Everything that names a physical register or produces bytes
// lives in the x64 module and builds on the plans produced here.

//! Core fmaxgen infrastructure.
//!
//! # Key Components
//!
//! ## Tournament planning (`tournament`)
//! - Logical slot numbering, one slot per input
//! - Smallest-pair-first reduction rounds with odd slot carry-over
//! - A reference interpreter with `vmaxsd` semantics
//!
//! ## Errors (`error`)
//! - `GenError` for everything outside the total planner

pub mod error;
pub mod tournament;

pub use error::{GenError, GenResult};
pub use tournament::{Generation, MaxTree, Op, Slot, NEG_INF_BITS, RESULT_SLOT};
