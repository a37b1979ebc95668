use std::io::{self, Write};

use crate::common::inst::{CondOp, Inst};
use crate::common::program::{Program, Symbol};
use crate::vm::debug::Command;
use crate::vm::trace::Trace;

/// A `Vm` executes one `Program` at a time. Its state (instruction
/// pointer, frame pointer, and a single i32 stack) is self-contained,
/// so more than one can be spawned if needed.
/// Guest `print` output goes to `out`, which lets tests capture it;
/// the interactive debugger talks to the terminal directly.
#[derive(Debug)]
pub struct Vm<W: Write> {
    pub(crate) pc: usize,
    pub(crate) fp: usize,
    pub(crate) stack: Vec<i32>,
    debug: bool,
    out: W,
}

// this impl contains initialization, the stack helpers, and the core
// interpreter loop; the next one holds the instruction implementations

impl Vm<io::Stdout> {
    pub fn new() -> Vm<io::Stdout> {
        Vm::with_output(io::stdout())
    }
}

impl<W: Write> Vm<W> {
    pub fn with_output(out: W) -> Vm<W> {
        Vm {
            pc: 0,
            fp: 0,
            stack: vec![],
            debug: false,
            out,
        }
    }

    /// Turns the interactive step-debugger on or off.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// The machine stack, bottom first.
    pub fn stack(&self) -> &[i32] {
        &self.stack
    }

    /// Where the machine stopped; one past the last instruction after
    /// a clean run.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Hands back the output sink, typically to read captured prints.
    pub fn into_output(self) -> W {
        self.out
    }

    fn push_stack(&mut self, value: i32) {
        self.stack.push(value);
    }

    fn pop_stack(&mut self) -> Result<i32, Trace> {
        self.stack
            .pop()
            .ok_or_else(|| Trace::error("stack", "pop from an empty stack", self.pc))
    }

    fn read_stack(&self, index: i64) -> Result<i32, Trace> {
        if index >= 0 {
            if let Some(value) = self.stack.get(index as usize) {
                return Ok(*value);
            }
        }
        Err(Trace::error(
            "stack",
            &format!("read out of range (index {}, stack size {})", index, self.stack.len()),
            self.pc,
        ))
    }

    fn write_stack(&mut self, index: usize, value: i32) -> Result<(), Trace> {
        if index < self.stack.len() {
            self.stack[index] = value;
            return Ok(());
        }
        Err(Trace::error(
            "stack",
            &format!("write out of range (index {}, stack size {})", index, self.stack.len()),
            self.pc,
        ))
    }

    /// Converts a popped frame value (saved fp/pc or arity) back into
    /// an index; a negative value means the frame got clobbered.
    fn frame_value(&self, value: i32) -> Result<usize, Trace> {
        if value < 0 {
            return Err(Trace::error(
                "frame",
                &format!("corrupt frame value {}", value),
                self.pc,
            ));
        }
        Ok(value as usize)
    }

    fn target(&self, prog: &Program, label: &str) -> Result<Symbol, Trace> {
        prog.symbol(label)
            .copied()
            .ok_or_else(|| Trace::error("label", &format!("unknown label '{}'", label), self.pc))
    }

    /// Runs `prog` until the program counter walks off the end of the
    /// instruction stream, or until the first fault.
    pub fn eval(&mut self, prog: &Program) -> Result<(), Trace> {
        while self.pc < prog.insts.len() {
            if self.debug {
                match self.prompt(prog) {
                    Command::Step => (),
                    Command::DebugOff => self.debug = false,
                    Command::Quit => return Ok(()),
                }
            }
            self.step(prog)?;
        }
        Ok(())
    }

    /// Dispatches a single instruction. Straight-line instructions
    /// advance `pc` by one; jumps, calls, and returns set it
    /// themselves.
    fn step(&mut self, prog: &Program) -> Result<(), Trace> {
        match &prog.insts[self.pc] {
            Inst::Push(n) => {
                self.push_stack(*n);
                self.pc += 1;
            }
            Inst::PushFp(offset) => {
                let value = self.read_stack(self.fp as i64 + *offset as i64)?;
                self.push_stack(value);
                self.pc += 1;
            }
            Inst::PopFp(slot) => {
                let value = self.pop_stack()?;
                let index = self.fp + slot;
                while index >= self.stack.len() {
                    self.stack.push(0);
                }
                self.stack[index] = value;
                self.pc += 1;
            }
            Inst::StFp { local, argpos } => {
                let value = self.read_stack(self.fp as i64 - (*argpos as i64 + 4))?;
                self.write_stack(self.fp + local, value)?;
                self.pc += 1;
            }
            Inst::Add => {
                let (left, right) = self.operands()?;
                self.push_stack(left.wrapping_add(right));
                self.pc += 1;
            }
            Inst::Sub => {
                let (left, right) = self.operands()?;
                self.push_stack(left.wrapping_sub(right));
                self.pc += 1;
            }
            Inst::Cond(op) => {
                let (left, right) = self.operands()?;
                self.push_stack(Self::cond(*op, left, right));
                self.pc += 1;
            }
            Inst::Jmp(label) => {
                self.pc = self.target(prog, label)?.loc;
            }
            Inst::Jz(label) => {
                let value = self.pop_stack()?;
                if value == 0 {
                    self.pc = self.target(prog, label)?.loc;
                } else {
                    self.pc += 1;
                }
            }
            Inst::Jnz(label) => {
                let value = self.pop_stack()?;
                if value != 0 {
                    self.pc = self.target(prog, label)?.loc;
                } else {
                    self.pc += 1;
                }
            }
            Inst::Call { label, argc } => self.call(prog, label, *argc)?,
            Inst::RetVal => self.ret_val()?,
            Inst::Ret => self.ret()?,
        }
        Ok(())
    }
}

// the instruction implementations that don't fit in a match arm

impl<W: Write> Vm<W> {
    /// Pops `(left, right)` for a two-operand instruction.
    fn operands(&mut self) -> Result<(i32, i32), Trace> {
        let right = self.pop_stack()?;
        let left = self.pop_stack()?;
        Ok((left, right))
    }

    fn cond(op: CondOp, left: i32, right: i32) -> i32 {
        match op {
            CondOp::And => left & right,
            CondOp::Or => left | right,
            CondOp::Lt => (left < right) as i32,
            CondOp::Gt => (left > right) as i32,
            CondOp::Le => (left <= right) as i32,
            CondOp::Ge => (left >= right) as i32,
            CondOp::Eq => (left == right) as i32,
            CondOp::Ne => (left != right) as i32,
        }
    }

    /// The one host built-in: pops `argc` values and prints them,
    /// last-pushed argument first, each followed by a single space,
    /// then a newline.
    fn print(&mut self, argc: usize) -> Result<(), Trace> {
        for _ in 0..argc {
            let value = self.pop_stack()?;
            write!(self.out, "{} ", value)
                .map_err(|e| Trace::error("output", &e.to_string(), self.pc))?;
        }
        writeln!(self.out).map_err(|e| Trace::error("output", &e.to_string(), self.pc))?;
        self.pc += 1;
        Ok(())
    }

    /// The caller half of the calling convention. The arguments are
    /// already on the stack; this pushes the frame triple
    /// `(fp, return pc, nargs)`, points `fp` just past it, and zeroes
    /// the callee's local slots.
    fn call(&mut self, prog: &Program, label: &str, argc: usize) -> Result<(), Trace> {
        if label == "print" {
            return self.print(argc);
        }

        let sym = prog.symbol(label).copied().ok_or_else(|| {
            Trace::error("call", &format!("call to unknown function '{}'", label), self.pc)
        })?;

        self.push_stack(self.fp as i32);
        self.push_stack(self.pc as i32 + 1);
        self.push_stack(sym.nargs as i32);
        self.pc = sym.loc;
        self.fp = self.stack.len();
        for _ in 0..sym.nlocals {
            self.push_stack(0);
        }

        Ok(())
    }

    /// The callee half, with a value: drop the local frame, restore
    /// the triple, drop the argument slots, push the result.
    fn ret_val(&mut self) -> Result<(), Trace> {
        let ret = self.pop_stack()?;
        self.stack.truncate(self.fp);

        let nargs_raw = self.pop_stack()?;
        let nargs = self.frame_value(nargs_raw)?;
        let pc_raw = self.pop_stack()?;
        self.pc = self.frame_value(pc_raw)?;
        let fp_raw = self.pop_stack()?;
        self.fp = self.frame_value(fp_raw)?;

        for _ in 0..nargs {
            self.pop_stack()?;
        }
        self.push_stack(ret);

        Ok(())
    }

    /// A void return only restores the triple from the top of the
    /// stack; the local frame and the argument slots stay behind.
    fn ret(&mut self) -> Result<(), Trace> {
        let _nargs = self.pop_stack()?;
        let pc_raw = self.pop_stack()?;
        self.pc = self.frame_value(pc_raw)?;
        let fp_raw = self.pop_stack()?;
        self.fp = self.frame_value(fp_raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compile;

    fn run(source: &str) -> (String, Vec<i32>, usize) {
        let prog = compile(&Source::source(source)).unwrap();
        let mut vm = Vm::with_output(Vec::new());
        vm.eval(&prog).unwrap();

        let pc = vm.pc();
        let stack = vm.stack().to_vec();
        let output = String::from_utf8(vm.into_output()).unwrap();
        (output, stack, pc)
    }

    #[test]
    fn straight_line_pc_progress() {
        let prog = compile(&Source::source("local a = 1; local b = 2;")).unwrap();
        // no branches: every instruction executes exactly once
        let mut vm: Vm<Vec<u8>> = Vm::with_output(Vec::new());
        vm.eval(&prog).unwrap();
        assert_eq!(vm.pc(), prog.insts.len());
    }

    #[test]
    fn locals_live_in_frame_slots() {
        let (_, stack, _) = run("local a = 2; local b = 3;");
        assert_eq!(stack, vec![2, 3]);
    }

    #[test]
    fn arithmetic_wraps() {
        let (output, _, _) = run("print(2147483647 + 1);");
        assert_eq!(output, "-2147483648 \n");

        let (output, _, _) = run("local a = 0; local b = 2147483647; print(0 - b);");
        assert_eq!(output, "-2147483647 \n");
    }

    #[test]
    fn comparisons_push_flags() {
        let (output, _, _) = run("print(1 < 2, 2 < 1, 3 <= 3, 4 >= 5, 5 == 5, 5 != 5);");
        // last-pushed first
        assert_eq!(output, "0 1 0 1 0 1 \n");
    }

    #[test]
    fn frames_balance_across_calls() {
        let (output, stack, _) = run("function id(x) return x; end print(id(9));");
        assert_eq!(output, "9 \n");
        // call consumed its argument, print consumed the result
        assert!(stack.is_empty());
    }

    #[test]
    fn nested_calls_restore_the_frame() {
        let source = "\
            function inner(x) return x + 1; end \
            function outer(y) local t = inner(y); return t + 10; end \
            print(outer(5));";
        let (output, stack, _) = run(source);
        assert_eq!(output, "16 \n");
        assert!(stack.is_empty());
    }

    #[test]
    fn unknown_function_is_a_fault() {
        let prog = compile(&Source::source("print(missing(1));")).unwrap();
        let mut vm: Vm<Vec<u8>> = Vm::with_output(Vec::new());

        let result = vm.eval(&prog);
        assert_eq!(
            result,
            Err(Trace::error("call", "call to unknown function 'missing'", 1))
        );
    }

    #[test]
    fn top_level_return_underflows() {
        let prog = compile(&Source::source("return 1;")).unwrap();
        let mut vm: Vm<Vec<u8>> = Vm::with_output(Vec::new());
        // RETVAL with no frame triple below it
        assert!(vm.eval(&prog).is_err());
    }

    #[test]
    fn jump_past_the_end_halts() {
        // the else-less branch jumps to label_out at the very end
        let (output, _, _) = run("if 1 < 2 then print(7); else print(8); end");
        assert_eq!(output, "7 \n");
    }
}
