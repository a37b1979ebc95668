use std::rc::Rc;

use crate::common::location::Location;
use crate::common::source::Source;
use crate::common::token::{Token, TokenKind, KEYWORDS, OPERATORS, SYNTAX};
use crate::compiler::syntax::Syntax;

// The lexer makes a single pass over the source with one byte of
// lookahead. Each sub-lexer tries to match at the cursor and backs
// off without consuming anything when it can't; the first hit in a
// fixed order (keyword, identifier, number, syntax, operator) wins.

/// Lexes a whole source file into a token vector.
pub fn lex(source: &Rc<Source>) -> Result<Vec<Token>, Syntax> {
    let mut tokens = vec![];

    for step in Lexer::new(source) {
        let (token, _) = step?;
        tokens.push(token);
    }

    Ok(tokens)
}

/// A restartable iterator over the tokens of one `Source`.
/// Yields `(token, location just past the token)` pairs and simply
/// stops at end of input.
#[derive(Debug)]
pub struct Lexer {
    source: Rc<Source>,
    loc: Location,
}

/// What a sub-lexer produces on a hit: the token and the post-match
/// location. `None` means "not mine", with nothing consumed.
type Match = Option<(Token, Location)>;

impl Lexer {
    pub fn new(source: &Rc<Source>) -> Lexer {
        Lexer {
            source: Rc::clone(source),
            loc: Location::start(),
        }
    }

    /// Rewinds the lexer to the start of its source.
    pub fn reset(&mut self) {
        self.loc = Location::start();
    }

    fn remaining(&self) -> &str {
        &self.source.contents[self.loc.offset..]
    }

    /// Eats whitespace, tracking lines as it goes.
    fn strip(&mut self) {
        while let Some(c) = self.remaining().chars().next() {
            match c {
                '\n' => self.loc = self.loc.step(true),
                ' ' | '\t' | '\r' | '\x0b' | '\x0c' => self.loc = self.loc.step(false),
                _ => break,
            }
        }
    }

    fn eat_keyword(&self) -> Match {
        let rest = self.remaining();

        for keyword in KEYWORDS.iter().copied() {
            // a prefix hit is enough; "endless" lexes as `end` + `less`
            if rest.starts_with(keyword) {
                let token = Token::new(TokenKind::Keyword, keyword, self.loc);
                return Some((token, self.loc.skip(keyword.len())));
            }
        }

        None
    }

    fn eat_identifier(&self) -> Match {
        let rest = self.remaining();
        let len = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .count();

        if len == 0 {
            return None;
        }

        let literal = &rest[..len];
        // a digit-leading run belongs to the number sub-lexer
        if literal.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let token = Token::new(TokenKind::Identifier, literal, self.loc);
        Some((token, self.loc.skip(len)))
    }

    fn eat_number(&self) -> Match {
        let rest = self.remaining();
        let mut chars = rest.chars().peekable();
        let mut literal = String::new();
        let mut sign = 0;

        match chars.peek() {
            Some('-') => {
                literal.push('-');
                chars.next();
                sign = 1;
            }
            // an explicit plus is eaten but dropped from the literal
            Some('+') => {
                chars.next();
                sign = 1;
            }
            _ => (),
        }

        let digits = chars.take_while(|c| c.is_ascii_digit()).count();
        // a bare sign is not a number; this is what lets `n - 1`
        // reach the operator sub-lexer
        if digits == 0 {
            return None;
        }

        literal.push_str(&rest[sign..sign + digits]);
        let token = Token::new(TokenKind::Number, &literal, self.loc);
        Some((token, self.loc.skip(sign + digits)))
    }

    fn eat_syntax(&self) -> Match {
        let mut chars = self.remaining().chars();
        let c = chars.next()?;

        if !SYNTAX.contains(&c) {
            return None;
        }
        // leave `==` for the operator sub-lexer
        if c == '=' && chars.next() == Some('=') {
            return None;
        }

        let token = Token::new(TokenKind::Syntax, &c.to_string(), self.loc);
        Some((token, self.loc.skip(1)))
    }

    fn eat_operator(&self) -> Match {
        let rest = self.remaining();

        for op in OPERATORS.iter().copied() {
            if rest.starts_with(op) {
                let token = Token::new(TokenKind::Operator, op, self.loc);
                return Some((token, self.loc.skip(op.len())));
            }
        }

        None
    }

    fn next_token(&mut self) -> Option<Result<(Token, Location), Syntax>> {
        self.strip();

        let first = match self.remaining().chars().next() {
            Some(c) => c,
            None => return None,
        };

        let hit = self
            .eat_keyword()
            .or_else(|| self.eat_identifier())
            .or_else(|| self.eat_number())
            .or_else(|| self.eat_syntax())
            .or_else(|| self.eat_operator());

        match hit {
            Some((token, next_loc)) => {
                self.loc = next_loc;
                Some(Ok((token, next_loc)))
            }
            None => {
                let error = Syntax::error(&format!("unexpected character '{}'", first), self.loc);
                // fuse: an erroring lexer yields nothing more
                self.loc.offset = self.source.contents.len();
                Some(Err(error))
            }
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<(Token, Location), Syntax>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
