use std::fmt;

use crate::common::token::Token;

// A program is an ordered vector of statements; there is no block
// node at the top level. Statement bodies own their children, and
// expressions are cheap to clone (they bottom out in tokens).

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    Local {
        name: Token,
        init: Expr,
    },
    Return(Expr),
    Expr(Expr),
    FuncDecl {
        name: Token,
        params: Vec<Token>,
        body: Vec<Stmt>,
    },
}

/// An expression. The grammar is flat on purpose: a binary node's
/// operands are always single primaries, never other binaries.
/// Call arguments are the one place arbitrary expressions nest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(Token),
    Id(Token),
    Call { name: Token, args: Vec<Expr> },
    Binary { op: Token, left: Box<Expr>, right: Box<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(token) => write!(f, "(number {})", token.literal),
            Expr::Id(token) => write!(f, "(id {})", token.literal),
            Expr::Call { name, args } => {
                write!(f, "(call {}", name.literal)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Binary { op, left, right } => {
                write!(f, "(binary_op {} {} {})", op.literal.trim_end(), left, right)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::If { condition, then_body, else_body } => {
                write!(f, "(if (cond {}) (then", condition)?;
                for stmt in then_body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, ") (else")?;
                for stmt in else_body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, "))")
            }
            Stmt::Local { name, init } => write!(f, "(local {} {})", name.literal, init),
            Stmt::Return(expr) => write!(f, "(return {})", expr),
            Stmt::Expr(expr) => write!(f, "(expr {})", expr),
            Stmt::FuncDecl { name, params, body } => {
                write!(f, "(function {} (params", name.literal)?;
                for param in params {
                    write!(f, " {}", param.literal)?;
                }
                write!(f, ") (body")?;
                for stmt in body {
                    write!(f, " {}", stmt)?;
                }
                write!(f, "))")
            }
        }
    }
}
