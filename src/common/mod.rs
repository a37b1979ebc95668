//! Datastructures shared by the `compiler` and the `vm`:
//!
//! - Source code representation and cursor locations.
//! - Tokens and the fixed keyword/syntax/operator tables.
//! - The instruction set and compiled `Program`s.

pub mod source;
pub mod location;
pub mod token;
pub mod inst;
pub mod program;
