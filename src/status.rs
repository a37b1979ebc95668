use colored::{ColoredString, Colorize};

/// Severity of a status line.
pub enum Kind {
    Info,
    Success,
    Warn,
    Fatal,
}

/// A leveled, colored status line. The driver logs one per pipeline
/// phase; everything goes to stdout, interleaved with the guest
/// program's own output.
pub struct Status(pub Kind, pub &'static str);

impl Status {
    pub fn info() -> Status {
        Status(Kind::Info, "Info")
    }
    pub fn success() -> Status {
        Status(Kind::Success, "Success")
    }
    pub fn warn() -> Status {
        Status(Kind::Warn, "Warning")
    }
    pub fn fatal() -> Status {
        Status(Kind::Fatal, "Fatal")
    }

    fn tag(&self) -> ColoredString {
        match self.0 {
            Kind::Info => self.1.blue(),
            Kind::Success => self.1.green(),
            Kind::Warn => self.1.yellow(),
            Kind::Fatal => self.1.red(),
        }
        .bold()
    }

    pub fn log(&self, message: &str) {
        let mut lines = message.lines();
        match lines.next() {
            None => println!("{:>8}", self.tag()),
            Some(first) => {
                println!("{:>8} {}", self.tag(), first);
                for line in lines {
                    println!("{:>8} {}", "", line);
                }
            }
        }
    }
}
