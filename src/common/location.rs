use std::fmt;

/// A `Location` is a byte-grained cursor into a source file.
/// `line` and `column` are 1-based and exist for error messages;
/// `offset` is the 0-based byte index the lexer actually works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    /// The location of the very first byte of a source.
    pub fn start() -> Location {
        Location { line: 1, column: 1, offset: 0 }
    }

    /// Returns a location advanced by exactly one byte.
    /// A newline bumps the line and resets the column;
    /// any other byte just moves the column along.
    pub fn step(&self, is_newline: bool) -> Location {
        if is_newline {
            Location {
                line: self.line + 1,
                column: 1,
                offset: self.offset + 1,
            }
        } else {
            Location {
                line: self.line,
                column: self.column + 1,
                offset: self.offset + 1,
            }
        }
    }

    /// Steps over `len` bytes of newline-free text.
    /// Tokens can't contain newlines, so this is what the sub-lexers
    /// use to compute their post-match location.
    pub fn skip(&self, len: usize) -> Location {
        let mut loc = *self;
        for _ in 0..len {
            loc = loc.step(false);
        }
        loc
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn step_column() {
        let loc = Location::start().step(false);
        assert_eq!(loc, Location { line: 1, column: 2, offset: 1 });
    }

    #[test]
    fn step_newline() {
        let loc = Location::start().step(false).step(true);
        assert_eq!(loc, Location { line: 2, column: 1, offset: 2 });
    }

    #[test]
    fn skip_is_repeated_step() {
        let mut stepped = Location::start();
        for _ in 0..7 {
            stepped = stepped.step(false);
        }
        assert_eq!(Location::start().skip(7), stepped);
    }
}
