use crate::common::location::Location;
use crate::common::token::{Token, TokenKind};
use crate::compiler::ast::{Expr, Stmt};
use crate::compiler::syntax::Syntax;

// Recursive descent over the token vector, indices instead of slices.
// Each statement parser either declines (its leading token isn't one
// of its own) or commits; once committed, a malformed tail is fatal.

/// A parser's yield: the parsed node plus the index of the first
/// unconsumed token, or `None` when the alternative doesn't apply.
type Yield<T> = Option<(T, usize)>;

/// Parses a token vector into an ordered statement list, or fails on
/// the first statement that can't be completed.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Stmt>, Syntax> {
    Parser { tokens }.program()
}

struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    fn program(&self) -> Result<Vec<Stmt>, Syntax> {
        let mut ast = vec![];
        let mut it = 0;

        while it < self.tokens.len() {
            match self.statement(it)? {
                Some((stmt, next)) => {
                    ast.push(stmt);
                    it = next;
                }
                None => return Err(self.unexpected(it, "a statement")),
            }
        }

        Ok(ast)
    }

    /// Tries every statement form in fixed order; the first one whose
    /// leading token matches takes over.
    fn statement(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        if let Some(hit) = self.if_statement(it)? {
            return Ok(Some(hit));
        }
        if let Some(hit) = self.return_statement(it)? {
            return Ok(Some(hit));
        }
        if let Some(hit) = self.expression_statement(it)? {
            return Ok(Some(hit));
        }
        if let Some(hit) = self.function_declaration(it)? {
            return Ok(Some(hit));
        }
        if let Some(hit) = self.local_declaration(it)? {
            return Ok(Some(hit));
        }
        Ok(None)
    }

    // token probes; all of them decline quietly at end of input

    fn at(&self, it: usize) -> Option<&Token> {
        self.tokens.get(it)
    }

    fn expect_keyword(&self, it: usize, keyword: &str) -> bool {
        matches!(self.at(it), Some(t) if t.kind == TokenKind::Keyword && t.literal == keyword)
    }

    fn expect_syntax(&self, it: usize, syntax: &str) -> bool {
        matches!(self.at(it), Some(t) if t.kind == TokenKind::Syntax && t.literal == syntax)
    }

    fn expect_identifier(&self, it: usize) -> bool {
        matches!(self.at(it), Some(t) if t.kind == TokenKind::Identifier)
    }

    /// A fatal error naming whatever sits at `it`.
    fn unexpected(&self, it: usize, wanted: &str) -> Syntax {
        match self.at(it) {
            Some(t) => Syntax::error(
                &format!("expected {}, found {} '{}'", wanted, t.kind, t.literal),
                t.loc,
            ),
            None => {
                let loc = self.tokens.last().map(|t| t.loc).unwrap_or_else(Location::start);
                let eof = Token::eof(loc);
                Syntax::error(&format!("expected {}, found {}", wanted, eof.kind), eof.loc)
            }
        }
    }

    fn required_statement(&self, it: usize) -> Result<(Stmt, usize), Syntax> {
        match self.statement(it)? {
            Some(hit) => Ok(hit),
            None => Err(self.unexpected(it, "a statement")),
        }
    }

    fn required_expression(&self, it: usize, wanted: &str) -> Result<(Expr, usize), Syntax> {
        match self.expression(it)? {
            Some(hit) => Ok(hit),
            None => Err(self.unexpected(it, wanted)),
        }
    }

    // statement forms

    /// `if EXPR then STMT* (else STMT*)? end`
    fn if_statement(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        if !self.expect_keyword(it, "if") {
            return Ok(None);
        }

        let (condition, mut next) = self.required_expression(it + 1, "a condition after 'if'")?;

        if !self.expect_keyword(next, "then") {
            return Err(self.unexpected(next, "'then'"));
        }
        next += 1;

        let mut then_body = vec![];
        while !self.expect_keyword(next, "end") && !self.expect_keyword(next, "else") {
            let (stmt, after) = self.required_statement(next)?;
            then_body.push(stmt);
            next = after;
        }

        let mut else_body = vec![];
        if self.expect_keyword(next, "else") {
            next += 1;
            while !self.expect_keyword(next, "end") {
                let (stmt, after) = self.required_statement(next)?;
                else_body.push(stmt);
                next = after;
            }
        }

        // both loops only stop on 'end'
        next += 1;
        Ok(Some((Stmt::If { condition, then_body, else_body }, next)))
    }

    /// `return EXPR ;`
    fn return_statement(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        if !self.expect_keyword(it, "return") {
            return Ok(None);
        }

        let (expr, next) = self.required_expression(it + 1, "an expression after 'return'")?;

        if !self.expect_syntax(next, ";") {
            return Err(self.unexpected(next, "';'"));
        }
        Ok(Some((Stmt::Return(expr), next + 1)))
    }

    /// `EXPR ;`
    fn expression_statement(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        let (expr, next) = match self.expression(it)? {
            Some(hit) => hit,
            None => return Ok(None),
        };

        if !self.expect_syntax(next, ";") {
            return Err(self.unexpected(next, "';'"));
        }
        Ok(Some((Stmt::Expr(expr), next + 1)))
    }

    /// `function IDENT ( IDENT (, IDENT)* ) STMT* end`
    fn function_declaration(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        if !self.expect_keyword(it, "function") {
            return Ok(None);
        }
        let mut next = it + 1;

        if !self.expect_identifier(next) {
            return Err(self.unexpected(next, "a function name"));
        }
        let name = self.tokens[next].clone();
        next += 1;

        if !self.expect_syntax(next, "(") {
            return Err(self.unexpected(next, "'('"));
        }
        next += 1;

        let mut params = vec![];
        while !self.expect_syntax(next, ")") {
            if !params.is_empty() {
                if !self.expect_syntax(next, ",") {
                    return Err(self.unexpected(next, "','"));
                }
                next += 1;
            }
            if !self.expect_identifier(next) {
                return Err(self.unexpected(next, "a parameter name"));
            }
            params.push(self.tokens[next].clone());
            next += 1;
        }
        next += 1; // )

        let mut body = vec![];
        while !self.expect_keyword(next, "end") {
            let (stmt, after) = self.required_statement(next)?;
            body.push(stmt);
            next = after;
        }
        next += 1; // end

        Ok(Some((Stmt::FuncDecl { name, params, body }, next)))
    }

    /// `local IDENT = EXPR ;`
    fn local_declaration(&self, it: usize) -> Result<Yield<Stmt>, Syntax> {
        if !self.expect_keyword(it, "local") {
            return Ok(None);
        }
        let mut next = it + 1;

        if !self.expect_identifier(next) {
            return Err(self.unexpected(next, "a name after 'local'"));
        }
        let name = self.tokens[next].clone();
        next += 1;

        if !self.expect_syntax(next, "=") {
            return Err(self.unexpected(next, "'='"));
        }
        next += 1;

        let (init, next) = self.required_expression(next, "an initializer expression")?;

        if !self.expect_syntax(next, ";") {
            return Err(self.unexpected(next, "';'"));
        }
        Ok(Some((Stmt::Local { name, init }, next + 1)))
    }

    // expressions

    /// The deliberately flat expression grammar: a primary, a call on
    /// an identifier, or `primary op primary`. Declines when the
    /// leading token can't start an expression.
    fn expression(&self, it: usize) -> Result<Yield<Expr>, Syntax> {
        let left_token = match self.at(it) {
            Some(t) => t.clone(),
            None => return Ok(None),
        };
        let left = match left_token.kind {
            TokenKind::Number => Expr::Number(left_token.clone()),
            TokenKind::Identifier => Expr::Id(left_token.clone()),
            _ => return Ok(None),
        };
        let mut next = it + 1;

        // call: arguments are full expressions, commas optional
        if left_token.kind == TokenKind::Identifier && self.expect_syntax(next, "(") {
            next += 1;
            let mut args = vec![];
            while !self.expect_syntax(next, ")") {
                let (arg, after) = self.required_expression(next, "an argument expression")?;
                args.push(arg);
                next = after;
                if self.expect_syntax(next, ",") {
                    next += 1;
                }
            }
            next += 1; // )
            return Ok(Some((Expr::Call { name: left_token, args }, next)));
        }

        // bare primary
        let op = match self.at(next) {
            Some(t) if t.kind == TokenKind::Operator => t.clone(),
            _ => return Ok(Some((left, next))),
        };
        next += 1;

        // binary: exactly one operator, the right operand a primary
        let right_token = match self.at(next) {
            Some(t) => t.clone(),
            None => return Err(self.unexpected(next, "a right operand")),
        };
        let right = match right_token.kind {
            TokenKind::Number => Expr::Number(right_token),
            TokenKind::Identifier => Expr::Id(right_token),
            _ => return Err(self.unexpected(next, "a literal operand")),
        };
        next += 1;

        let binary = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        Ok(Some((binary, next)))
    }
}
