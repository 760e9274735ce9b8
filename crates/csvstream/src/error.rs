use std::{io, sync::Arc};

use thiserror::Error;

/// A location in the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Absolute byte offset from the start of the stream.
    pub byte: u64,
    /// 1-based line number. Every `\n` counts, including those inside
    /// quoted fields.
    pub line: u64,
    /// 1-based number of the record being assembled.
    pub record: u64,
}

impl Position {
    pub(crate) const fn start() -> Self {
        Self {
            byte: 0,
            line: 1,
            record: 1,
        }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "record {} (line {}, byte {})",
            self.record, self.line, self.byte
        )
    }
}

/// A fatal condition reported by [`Reader`](crate::Reader).
///
/// Errors are latched: once one is observed, the reader hands back a clone of
/// the same value on every later call and never touches its source again.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The byte source failed.
    #[error("read error: {0}")]
    Io(#[source] Arc<io::Error>),
    /// The input contains a byte sequence that is not valid UTF-8.
    #[error("invalid UTF-8 at {position}")]
    InvalidUtf8 {
        /// Where the malformed sequence starts.
        position: Position,
    },
}

impl Error {
    /// The position of a malformed sequence, if this is an encoding error.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::Io(_) => None,
            Error::InvalidUtf8 { position } => Some(*position),
        }
    }

    /// Whether this error came from the byte source.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::Io(a), Error::Io(b)) => Arc::ptr_eq(a, b),
            (Error::InvalidUtf8 { position: a }, Error::InvalidUtf8 { position: b }) => a == b,
            _ => false,
        }
    }
}
