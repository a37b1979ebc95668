use std::fmt;

/// Represents a runtime fault: stack underflow, an out-of-range
/// access, an unresolved label, a call to a function that doesn't
/// exist. The guest language has no error handling, so a `Trace`
/// always tears down the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    kind: String,
    message: String,
    pc: usize,
}

impl Trace {
    pub fn error(kind: &str, message: &str, pc: usize) -> Trace {
        Trace {
            kind: kind.to_string(),
            message: message.to_string(),
            pc,
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime {} error: {} (pc = {})", self.kind, self.message, self.pc)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let trace = Trace::error("call", "call to unknown function 'frobnicate'", 12);
        assert_eq!(
            format!("{}", trace),
            "Runtime call error: call to unknown function 'frobnicate' (pc = 12)"
        );
    }
}
