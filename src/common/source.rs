use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

/// The named contents of an RPAL program, shared (via `Rc`) by every
/// `Span` that points into it.
#[derive(Debug, Eq, PartialEq)]
pub struct Source {
    pub name: String,
    pub contents: String,
}

impl Source {
    /// Wraps a string as an in-memory source, useful for tests and the
    /// `-ast`/`-st` debug paths.
    pub fn source(contents: &str) -> Rc<Source> {
        Rc::new(Source {
            name: "./source".to_string(),
            contents: contents.to_string(),
        })
    }

    /// Reads a source file from disk.
    pub fn path(path: &Path) -> io::Result<Rc<Source>> {
        let contents = fs::read_to_string(path)?;
        Ok(Rc::new(Source {
            name: path.display().to_string(),
            contents,
        }))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
