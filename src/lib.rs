//! # vmlua
//! A tiny Lua-ish scripting language, compiled to and run on a small
//! stack machine. Source code moves through the pipeline in four
//! hops, each a plain function over the previous stage's output:
//!
//! 1. Tokens:   `compiler::lex`
//! 2. AST:      `compiler::parse`
//! 3. Bytecode: `compiler::gen` (instructions + symbol table)
//! 4. Output:   `vm::vm::Vm`
//!
//! The guest language is small on purpose: i32s are the only values,
//! an expression is at most one operator wide, and `print` is the one
//! built-in. What's left is the interesting part, the call frame ABI
//! the emitter and the machine have to agree on exactly.
//!
//! ```
//! use vmlua::{compile, common::source::Source, vm::vm::Vm};
//!
//! let source = Source::source("print(40 + 2);");
//! let prog = compile(&source).unwrap();
//!
//! let mut vm = Vm::with_output(Vec::new());
//! vm.eval(&prog).unwrap();
//! assert_eq!(vm.into_output(), b"42 \n");
//! ```

pub mod common;
pub mod compiler;
pub mod driver;
pub mod status;
pub mod vm;

use std::rc::Rc;

use common::program::Program;
use common::source::Source;
use compiler::syntax::Syntax;
use compiler::{gen, lex, parse};

/// Runs the compile half of the pipeline: source to `Program`.
pub fn compile(source: &Rc<Source>) -> Result<Program, Syntax> {
    let tokens = lex(source)?;
    let ast = parse(tokens)?;
    gen(&ast)
}
