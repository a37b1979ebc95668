use std::fmt;

use crate::common::location::Location;

/// A static error caught before the program runs: a lex, parse, or
/// emit failure. Carries the location the pipeline choked on.
/// There is no recovery: one `Syntax` tears down the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub reason: String,
    pub loc: Location,
}

impl Syntax {
    pub fn error(reason: &str, loc: Location) -> Syntax {
        Syntax { reason: reason.to_string(), loc }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax Error: {} (at {})", self.reason, self.loc)
    }
}
