use std::collections::HashMap;

use crate::common::inst::{CondOp, Inst};
use crate::common::program::{Program, Symbol};
use crate::common::token::Token;
use crate::compiler::ast::{Expr, Stmt};
use crate::compiler::syntax::Syntax;

// The emitter walks the AST once in program order. Generated label
// names bake in the instruction count at the point of emission, which
// keeps them unique without any extra counter.

/// Local-variable bindings for one function scope:
/// name -> slot index relative to the frame pointer.
type Locals = HashMap<String, i32>;

/// Lowers an AST to a `Program`.
pub fn gen(ast: &[Stmt]) -> Result<Program, Syntax> {
    let mut generator = Gen::new();
    let mut locals = Locals::new();

    for stmt in ast {
        generator.statement(&mut locals, stmt)?;
    }

    Ok(generator.prog)
}

struct Gen {
    prog: Program,
}

impl Gen {
    fn new() -> Gen {
        Gen { prog: Program::new() }
    }

    fn emit(&mut self, inst: Inst) {
        self.prog.insts.push(inst);
    }

    /// Registers a plain jump target at the current end of the stream.
    fn label(&mut self, name: String) {
        let sym = Symbol { loc: self.prog.insts.len(), nargs: 0, nlocals: 0 };
        self.prog.define(name, sym);
    }

    fn statement(&mut self, locals: &mut Locals, stmt: &Stmt) -> Result<(), Syntax> {
        match stmt {
            Stmt::If { condition, then_body, else_body } => {
                self.if_statement(locals, condition, then_body, else_body)
            }
            Stmt::Local { name, init } => self.local(locals, name, init),
            Stmt::Return(expr) => self.ret(locals, expr),
            Stmt::Expr(expr) => self.expression(locals, expr),
            Stmt::FuncDecl { name, params, body } => self.function(name, params, body),
        }
    }

    //  if c then A else B end
    //        <c>
    //        JZ  label_else
    //        <A>
    //        JMP label_out
    //  label_else:
    //        <B>
    //  label_out:
    fn if_statement(
        &mut self,
        locals: &mut Locals,
        condition: &Expr,
        then_body: &[Stmt],
        else_body: &[Stmt],
    ) -> Result<(), Syntax> {
        let label_else = format!("label_else_{}", self.prog.insts.len());
        let label_out = format!("label_out_{}", self.prog.insts.len());

        self.expression(locals, condition)?;
        self.emit(Inst::Jz(label_else.clone()));
        for stmt in then_body {
            self.statement(locals, stmt)?;
        }
        self.emit(Inst::Jmp(label_out.clone()));

        self.label(label_else);
        for stmt in else_body {
            self.statement(locals, stmt)?;
        }
        self.label(label_out);

        Ok(())
    }

    fn local(&mut self, locals: &mut Locals, name: &Token, init: &Expr) -> Result<(), Syntax> {
        // the first binding of a name wins, but the store still
        // targets the freshly computed slot
        let slot = locals.len();
        locals.entry(name.literal.clone()).or_insert(slot as i32);

        self.expression(locals, init)?;
        self.emit(Inst::PopFp(slot));
        Ok(())
    }

    fn ret(&mut self, locals: &mut Locals, expr: &Expr) -> Result<(), Syntax> {
        self.expression(locals, expr)?;
        self.emit(Inst::RetVal);
        Ok(())
    }

    fn function(&mut self, name: &Token, params: &[Token], body: &[Stmt]) -> Result<(), Syntax> {
        // top-level control flow hops over the body
        let done = format!("function_done_{}", self.prog.insts.len());
        self.emit(Inst::Jmp(done.clone()));
        let entry = self.prog.insts.len();

        // fresh scope: parameters land in the first local slots
        let mut locals = Locals::new();
        let nargs = params.len();
        for (index, param) in params.iter().enumerate() {
            self.emit(Inst::StFp { local: index, argpos: nargs - (index + 1) });
            locals.entry(param.literal.clone()).or_insert(index as i32);
        }

        for stmt in body {
            self.statement(&mut locals, stmt)?;
        }

        // a function that falls off its end returns without a value
        if self.prog.insts.last() != Some(&Inst::RetVal) {
            self.emit(Inst::Ret);
        }

        let sym = Symbol { loc: entry, nargs, nlocals: locals.len() };
        self.prog.define(name.literal.clone(), sym);
        self.label(done);

        Ok(())
    }

    fn expression(&mut self, locals: &mut Locals, expr: &Expr) -> Result<(), Syntax> {
        match expr {
            Expr::Number(token) => {
                let n = token.literal.parse::<i32>().map_err(|_| {
                    Syntax::error(
                        &format!("number literal '{}' does not fit in an i32", token.literal),
                        token.loc,
                    )
                })?;
                self.emit(Inst::Push(n));
            }
            Expr::Id(token) => {
                // an unbound name binds to offset 0 and counts toward
                // the scope's nlocals, mirroring the frame the VM
                // will allocate
                let offset = *locals.entry(token.literal.clone()).or_insert(0);
                self.emit(Inst::PushFp(offset));
            }
            Expr::Call { name, args } => {
                // arguments in source order, so the last one ends up
                // on top of the stack
                for arg in args {
                    self.expression(locals, arg)?;
                }
                self.emit(Inst::Call { label: name.literal.clone(), argc: args.len() });
            }
            Expr::Binary { op, left, right } => {
                self.expression(locals, left)?;
                self.expression(locals, right)?;
                let inst = match op.literal.as_str() {
                    "+" => Inst::Add,
                    "-" => Inst::Sub,
                    "<" => Inst::Cond(CondOp::Lt),
                    ">" => Inst::Cond(CondOp::Gt),
                    "<=" => Inst::Cond(CondOp::Le),
                    ">=" => Inst::Cond(CondOp::Ge),
                    "==" => Inst::Cond(CondOp::Eq),
                    "!=" => Inst::Cond(CondOp::Ne),
                    "&&" | "and " => Inst::Cond(CondOp::And),
                    "||" | "or " => Inst::Cond(CondOp::Or),
                    other => {
                        return Err(Syntax::error(
                            &format!("unknown operator '{}'", other.trim_end()),
                            op.loc,
                        ))
                    }
                };
                self.emit(inst);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::lex;
    use crate::compiler::parse::parse;

    fn gen_source(source: &str) -> Result<Program, Syntax> {
        gen(&parse(lex(&Source::source(source)).unwrap()).unwrap())
    }

    #[test]
    fn locals_and_arithmetic() {
        let prog = gen_source("local a = 2; local b = 3; print(a + b);").unwrap();

        let result = vec![
            Inst::Push(2),
            Inst::PopFp(0),
            Inst::Push(3),
            Inst::PopFp(1),
            Inst::PushFp(0),
            Inst::PushFp(1),
            Inst::Add,
            Inst::Call { label: "print".to_string(), argc: 1 },
        ];

        assert_eq!(prog.insts, result);
    }

    #[test]
    fn function_layout() {
        let prog = gen_source("function inc(x) return x + 1; end print(inc(41));").unwrap();

        let result = vec![
            Inst::Jmp("function_done_0".to_string()),
            Inst::StFp { local: 0, argpos: 0 },
            Inst::PushFp(0),
            Inst::Push(1),
            Inst::Add,
            Inst::RetVal,
            Inst::Push(41),
            Inst::Call { label: "inc".to_string(), argc: 1 },
            Inst::Call { label: "print".to_string(), argc: 1 },
        ];
        assert_eq!(prog.insts, result);

        assert_eq!(
            prog.symbol("inc"),
            Some(&Symbol { loc: 1, nargs: 1, nlocals: 1 })
        );
        assert_eq!(
            prog.symbol("function_done_0"),
            Some(&Symbol { loc: 6, nargs: 0, nlocals: 0 })
        );
    }

    #[test]
    fn parameters_copy_right_to_left() {
        let prog = gen_source("function three(a, b, c) return b; end").unwrap();

        // first parameter sits deepest below the frame
        assert_eq!(prog.insts[1], Inst::StFp { local: 0, argpos: 2 });
        assert_eq!(prog.insts[2], Inst::StFp { local: 1, argpos: 1 });
        assert_eq!(prog.insts[3], Inst::StFp { local: 2, argpos: 0 });
    }

    #[test]
    fn void_functions_get_a_ret() {
        let prog = gen_source("function shout(x) print(x); end").unwrap();
        assert_eq!(prog.insts.last(), Some(&Inst::Ret));
    }

    #[test]
    fn if_labels_close() {
        let prog = gen_source("if a < 5 then print(1); else print(0); end").unwrap();

        //  0 PUSH FP + 0        <a>
        //  1 PUSH 5
        //  2 COND LT
        //  3 JZ label_else_0
        //  4 PUSH 1
        //  5 CALL print
        //  6 JMP label_out_0
        //  7 PUSH 0             label_else_0:
        //  8 CALL print
        //                       label_out_0:
        assert_eq!(prog.symbol("label_else_0").map(|s| s.loc), Some(7));
        assert_eq!(prog.symbol("label_out_0").map(|s| s.loc), Some(9));

        for inst in &prog.insts {
            if let Inst::Jmp(label) | Inst::Jz(label) | Inst::Jnz(label) = inst {
                assert!(prog.symbol(label).is_some(), "unresolved label {}", label);
            }
        }
    }

    #[test]
    fn locals_are_scoped_per_function() {
        let prog = gen_source(
            "local a = 1; function f(x) local b = 2; return b; end local c = 3;",
        )
        .unwrap();

        // `c` lands in the *outer* scope's second slot, not the third
        assert_eq!(prog.insts.last(), Some(&Inst::PopFp(1)));
        assert_eq!(prog.symbol("f").map(|s| s.nlocals), Some(2));
    }

    #[test]
    fn unlowered_operators_fail() {
        for op in &["*", "/", "%", "^"] {
            let source = format!("print(1 {} 2);", op);
            assert!(gen_source(&source).is_err(), "operator {} should not lower", op);
        }
    }

    #[test]
    fn oversized_literals_fail() {
        assert!(gen_source("print(4294967296);").is_err());
        assert!(gen_source("print(2147483647);").is_ok());
        assert!(gen_source("print(-2147483648);").is_ok());
    }

    #[test]
    fn emission_is_deterministic() {
        let source = "function fib(n) if n < 2 then return n; end local a = n - 1; \
                      local b = n - 2; local x = fib(a); local y = fib(b); \
                      return x + y; end print(fib(5));";
        assert_eq!(gen_source(source), gen_source(source));
    }
}
