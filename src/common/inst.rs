use std::fmt;

/// A single stack-machine instruction.
/// Jumps and calls name their targets by label; the VM resolves them
/// through the program's symbol table at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// Push a constant.
    Push(i32),
    /// Push a copy of the local slot at `fp + offset`.
    PushFp(i32),
    /// Pop a value into the slot at `fp + slot`,
    /// growing the stack with zeros if the slot doesn't exist yet.
    PopFp(usize),
    /// Copy the call argument at `fp - (argpos + 4)` into the local
    /// slot at `fp + local`. Emitted once per parameter as the
    /// function prologue.
    StFp { local: usize, argpos: usize },
    /// Pop right, pop left, push `left + right` (wrapping).
    Add,
    /// Pop right, pop left, push `left - right` (wrapping).
    Sub,
    /// Pop right, pop left, push the comparison as 0/1
    /// (`And`/`Or` are bitwise on the operand words).
    Cond(CondOp),
    /// Unconditional jump.
    Jmp(String),
    /// Pop a value; jump when it is zero.
    Jz(String),
    /// Pop a value; jump when it is not zero.
    Jnz(String),
    /// Call a function; `print` is handled by the host.
    Call { label: String, argc: usize },
    /// Return carrying the value on top of the stack.
    RetVal,
    /// Return without a value.
    Ret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    And,
    Or,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl fmt::Display for CondOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CondOp::And => "AND",
            CondOp::Or => "OR",
            CondOp::Lt => "LT",
            CondOp::Gt => "GT",
            CondOp::Le => "LE",
            CondOp::Ge => "GE",
            CondOp::Eq => "EQ",
            CondOp::Ne => "NE",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::Push(n) => write!(f, "PUSH {}", n),
            Inst::PushFp(offset) => write!(f, "PUSH FP + {}", offset),
            Inst::PopFp(slot) => write!(f, "POP FP + {}", slot),
            Inst::StFp { local, argpos } => {
                write!(f, "ST FP - {} -> FP + {}", argpos + 4, local)
            }
            Inst::Add => write!(f, "ADD"),
            Inst::Sub => write!(f, "SUB"),
            Inst::Cond(op) => write!(f, "COND {}", op),
            Inst::Jmp(label) => write!(f, "JMP {}", label),
            Inst::Jz(label) => write!(f, "JZ {}", label),
            Inst::Jnz(label) => write!(f, "JNZ {}", label),
            Inst::Call { label, argc } => write!(f, "CALL {}, ARGC={}", label, argc),
            Inst::RetVal => write!(f, "RETVAL"),
            Inst::Ret => write!(f, "RET"),
        }
    }
}
