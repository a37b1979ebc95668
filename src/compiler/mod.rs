//! The compiler half of the pipeline.
//! Each step is a plain function turning one datatype into the next,
//! starting from a `Source` (string + path):
//!
//! 1. Tokens:   `lex.rs`
//! 2. AST:      `parse.rs`
//! 3. Bytecode: `gen.rs`
//!
//! Anything that goes wrong in here is a `Syntax` error; the guest
//! program never gets a chance to observe it.

pub mod syntax;

pub mod lex;
pub mod ast;
pub mod parse;
pub mod gen;

pub use gen::gen;
pub use lex::lex;
pub use parse::parse;
