use std::{fs, io, path::Path, path::PathBuf, rc::Rc};

/// `Source` is a chunk of guest code plus the path it was loaded
/// from, the path serving as the source's name in diagnostics.
/// Sources are handed around behind an `Rc` so the lexer can hold a
/// cursor into one without copying the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
}

impl From<(&str, &Path)> for Source {
    fn from((contents, path): (&str, &Path)) -> Source {
        Source {
            contents: contents.to_string(),
            path: path.to_owned(),
        }
    }
}

impl Source {
    /// Reads the file at `path`. This is how the driver gets its
    /// input; everything downstream shares the one allocation.
    pub fn path(path: &Path) -> io::Result<Rc<Source>> {
        let contents = fs::read_to_string(path)?;
        Ok(Rc::new(Source::from((contents.as_str(), path))))
    }

    /// Wraps a bare string under the placeholder path `./source`.
    /// Mostly useful in tests.
    pub fn source(contents: &str) -> Rc<Source> {
        Rc::new(Source::from((contents, Path::new("./source"))))
    }
}
