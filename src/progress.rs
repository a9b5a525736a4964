//! User-facing progress output.
//!
//! Progress lines (command echoes, status messages, the project summary) are
//! written to a shared sink so the binary can target stdout while tests read
//! them back from memory.

use std::cell::RefCell;
use std::fmt::{self, Display};
use std::io::{self, Write};
use std::rc::Rc;

/// Shared handle to the progress stream.
#[derive(Clone)]
pub struct Progress {
    sink: Rc<RefCell<Box<dyn Write>>>,
}

impl Progress {
    /// Writes progress to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    /// Writes progress to an arbitrary writer.
    #[must_use]
    pub fn to_writer(writer: impl Write + 'static) -> Self {
        Self {
            sink: Rc::new(RefCell::new(Box::new(writer))),
        }
    }

    /// Discards all progress output.
    #[must_use]
    pub fn sink() -> Self {
        Self::to_writer(io::sink())
    }

    /// Writes progress into memory and returns a handle to read it back.
    #[must_use]
    pub fn captured() -> (Self, CapturedProgress) {
        let buffer = CapturedProgress::default();
        (Self::to_writer(buffer.clone()), buffer)
    }

    /// Writes one line. Write errors are ignored.
    pub fn line(&self, message: impl Display) {
        let mut sink = self.sink.borrow_mut();
        writeln!(sink, "{message}").ok();
        sink.flush().ok();
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// In-memory progress buffer returned by [`Progress::captured`].
#[derive(Clone, Debug, Default)]
pub struct CapturedProgress {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl CapturedProgress {
    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// Returns the written lines in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for CapturedProgress {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
