use std::fmt;

use colored::Colorize;

use crate::common::location::Location;

/// Every reserved word, in matching order.
/// The keyword sub-lexer takes the first entry that prefixes the
/// input, so a keyword sharing a prefix with a longer one must come
/// after it (`elseif` before `else`).
pub const KEYWORDS: [&str; 20] = [
    "function", "end", "if", "elseif", "else", "while", "do", "in", "nil", "repeat",
    "util", "true", "false", "and", "or", "not", "break", "then", "local", "return",
];

/// Single-character punctuation.
pub const SYNTAX: [char; 5] = [';', '=', '(', ')', ','];

/// Operator literals, longer prefixes first so `==` beats `=` and
/// `<=` beats `<`. The trailing space on the word operators is part
/// of the literal; it's what separates them from identifiers that
/// merely begin with those letters.
pub const OPERATORS: [&str; 15] = [
    "and ", "or ", "not ", "==", "!=", ">=", "<=", "+", "-", "*", "/", "^", "%", ">", "<",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Syntax,
    Keyword,
    Number,
    Operator,
    Eof,
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Syntax => "syntax",
            TokenKind::Keyword => "keyword",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Eof => "end of input",
            TokenKind::Unknown => "unknown token",
        };
        write!(f, "{}", name)
    }
}

/// A single lexed token: what kind it is, the verbatim matched text,
/// and where in the source it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub loc: Location,
}

impl Token {
    pub fn new(kind: TokenKind, literal: &str, loc: Location) -> Token {
        Token { kind, literal: literal.to_string(), loc }
    }

    /// The token the parser reports when it runs off the end of the
    /// vector mid-statement.
    pub fn eof(loc: Location) -> Token {
        Token::new(TokenKind::Eof, "", loc)
    }
}

impl fmt::Display for Token {
    /// Colors the literal by kind, matching the driver's listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Keyword => write!(f, "{}", self.literal.blue()),
            TokenKind::Identifier => write!(f, "{}", self.literal.white()),
            TokenKind::Number => write!(f, "{}", self.literal.red()),
            _ => write!(f, "{}", self.literal),
        }
    }
}

/// Renders a numbered, one-token-per-line listing of a lexed file.
pub fn listing(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        out.push_str(&format!("{:>4} | {}\n", index, token));
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    // Both tables rely on "first prefix match wins", so no entry may
    // shadow a longer entry that comes after it.

    #[test]
    fn keywords_are_reachable() {
        for (i, earlier) in KEYWORDS.iter().enumerate() {
            for later in KEYWORDS.iter().skip(i + 1) {
                assert!(
                    !later.starts_with(earlier),
                    "'{}' shadows '{}'", earlier, later
                );
            }
        }
    }

    #[test]
    fn operators_are_reachable() {
        for (i, earlier) in OPERATORS.iter().enumerate() {
            for later in OPERATORS.iter().skip(i + 1) {
                assert!(
                    !later.starts_with(earlier),
                    "'{}' shadows '{}'", earlier, later
                );
            }
        }
    }
}
