//! # Output Sinks
//!
//! Cloneable text destinations used for normal and diagnostic output.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// A destination for human-readable text.
///
/// Clones share the same underlying destination, so a sink handed to a
/// per-command flag set writes to the same place as the commander's.
#[derive(Clone, Default)]
pub enum Sink {
    /// Process standard output
    #[default]
    Stdout,
    /// Process standard error
    Stderr,
    /// In-memory buffer, readable back with [`Sink::contents`]
    Buffer(Rc<RefCell<Vec<u8>>>),
    /// Any other writer
    Writer(Rc<RefCell<dyn Write>>),
}

impl Sink {
    /// Create an empty in-memory sink
    pub fn buffer() -> Self {
        Sink::Buffer(Rc::new(RefCell::new(Vec::new())))
    }

    /// Wrap an arbitrary writer
    pub fn writer<W: Write + 'static>(writer: W) -> Self {
        Sink::Writer(Rc::new(RefCell::new(writer)))
    }

    /// Text written so far to a buffer sink (empty for other kinds)
    pub fn contents(&self) -> String {
        match self {
            Sink::Buffer(buf) => String::from_utf8_lossy(&buf.borrow()).into_owned(),
            _ => String::new(),
        }
    }

    /// Discard everything written to a buffer sink
    pub fn clear(&self) {
        if let Sink::Buffer(buf) = self {
            buf.borrow_mut().clear();
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => write!(f, "Sink::Stdout"),
            Sink::Stderr => write!(f, "Sink::Stderr"),
            Sink::Buffer(buf) => write!(f, "Sink::Buffer({} bytes)", buf.borrow().len()),
            Sink::Writer(_) => write!(f, "Sink::Writer"),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(data),
            Sink::Stderr => io::stderr().write(data),
            Sink::Buffer(buf) => buf.borrow_mut().write(data),
            Sink::Writer(w) => w.borrow_mut().write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::Buffer(_) => Ok(()),
            Sink::Writer(w) => w.borrow_mut().flush(),
        }
    }
}
