use std::rc::Rc;

use crate::common::source::Source;
use crate::common::token;
use crate::compiler::{gen, lex, parse};
use crate::status::Status;
use crate::vm::vm::Vm;

/// Owns one run of the whole pipeline: source in, guest output and
/// diagnostics on stdout. Every phase's result is shown before the
/// next phase starts, so a failing stage leaves a visible trail.
pub struct Driver {
    source: Rc<Source>,
    debug: bool,
}

impl Driver {
    pub fn new(source: Rc<Source>, debug: bool) -> Driver {
        Driver { source, debug }
    }

    pub fn run(&self) -> Result<(), String> {
        let tokens = lex(&self.source).map_err(|e| e.to_string())?;
        Status::info().log("finished lexing");
        print!("{}", token::listing(&tokens));

        let ast = parse(tokens).map_err(|e| e.to_string())?;
        for stmt in ast.iter() {
            println!("syntax tree: {}", stmt);
        }

        let prog = gen(&ast).map_err(|e| e.to_string())?;
        Status::success().log("finished compiling");
        print!("{}", prog.disassemble(None));

        Status::info().log("running");
        let mut vm = Vm::new();
        vm.set_debug(self.debug);
        vm.eval(&prog).map_err(|e| e.to_string())?;
        Status::success().log("done");

        Ok(())
    }
}
