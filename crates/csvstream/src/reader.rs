use core::ops::Range;
use std::io::Read;

use tracing::debug;

use crate::buffer::Buffer;
use crate::error::{Error, Position};
use crate::row::Row;
use crate::scanner::{FieldEnd, Scanner};

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_FIELDS: usize = 16;

/// Outcome of assembling one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assembled {
    /// A row was collected; `last` when the stream ended while scanning it.
    Row { last: bool },
    /// The stream ended before the row had any field.
    Nothing,
}

/// Why a reader stopped producing rows.
#[derive(Debug, Clone)]
enum Terminal {
    EndOfStream,
    Failed(Error),
}

/// A streaming CSV reader over any [`Read`] source.
///
/// The format is fixed: fields are separated by `,`, may be wrapped in `"`
/// with `""` standing for one literal quote, and records end at `\n`. A `\r`
/// before the `\n` is dropped from the last field, so CRLF input reads the
/// same as LF input. Malformed quoting is read leniently rather than
/// rejected.
///
/// Two equivalent ways to pull rows share the same state and can be mixed:
///
/// ```rust
/// use csvstream::Reader;
///
/// let mut r = Reader::new("name,lang\nferris,rust\n".as_bytes());
/// while let Some(row) = r.read()? {
///     println!("{row:?}");
/// }
///
/// let mut r = Reader::new("name,lang\nferris,rust\n".as_bytes());
/// while r.next() {
///     println!("{:?}", r.fields());
/// }
/// if let Some(err) = r.err() {
///     return Err(err.clone());
/// }
/// # Ok::<(), csvstream::Error>(())
/// ```
///
/// # Borrowed rows
///
/// The reader keeps all bytes in one growable buffer and hands out rows that
/// borrow from it. Before each record the buffer drops the bytes of the
/// previous one and quoted fields are unescaped in place, so a [`Row`] can
/// not outlive the next `read` or `next` call. The borrow checker enforces
/// this; copy the fields out with [`Row::to_vec`] to keep them.
///
/// # Terminal state
///
/// End-of-stream, source errors and invalid UTF-8 are all terminal. Once one
/// is reached the reader never reads from its source again, and every later
/// call reports the same outcome. Reads that fail with
/// [`ErrorKind::Interrupted`](std::io::ErrorKind::Interrupted) are retried
/// and are not errors.
#[derive(Debug)]
pub struct Reader<R> {
    scanner: Scanner<R>,
    spans: Vec<Range<usize>>,
    terminal: Option<Terminal>,
}

impl<R: Read> Reader<R> {
    /// Creates a reader with a 1 KiB initial buffer.
    pub fn new(source: R) -> Self {
        Self::with_capacity(source, DEFAULT_CAPACITY)
    }

    /// Creates a reader whose buffer starts at `capacity` bytes. The buffer
    /// grows as needed to hold the longest record.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            scanner: Scanner::new(Buffer::with_capacity(source, capacity)),
            spans: Vec::with_capacity(DEFAULT_FIELDS),
            terminal: None,
        }
    }

    /// Reads the next row.
    ///
    /// Returns `Ok(None)` once the input is exhausted, and the same error on
    /// every call after a failure. The row borrows the reader's buffer and is
    /// invalidated by the next call.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the source fails and [`Error::InvalidUtf8`] if the
    /// input is not UTF-8.
    pub fn read(&mut self) -> Result<Option<Row<'_>>, Error> {
        if self.next() {
            return Ok(Some(self.fields()));
        }
        match &self.terminal {
            Some(Terminal::Failed(err)) => Err(err.clone()),
            Some(Terminal::EndOfStream) | None => Ok(None),
        }
    }

    /// Advances to the next row, returning whether there is one.
    ///
    /// After this returns `true` the row is available from
    /// [`fields`](Self::fields) until the next call. After it returns
    /// `false`, check [`err`](Self::err) to tell a clean end from a failure.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.terminal.is_some() {
            self.spans.clear();
            return false;
        }
        self.scanner.reset();
        self.spans.clear();

        match self.assemble() {
            Ok(Assembled::Row { last }) => {
                self.scanner.finish_record();
                if last {
                    self.latch(Terminal::EndOfStream);
                }
                true
            }
            Ok(Assembled::Nothing) => {
                self.latch(Terminal::EndOfStream);
                false
            }
            Err(err) => {
                self.spans.clear();
                self.latch(Terminal::Failed(err));
                false
            }
        }
    }

    /// Collects the fields of one row into `spans`.
    fn assemble(&mut self) -> Result<Assembled, Error> {
        let last = loop {
            let row_start = self.spans.is_empty();
            let Some(field) = self.scanner.next_field(row_start)? else {
                return Ok(Assembled::Nothing);
            };
            self.spans.push(field.span);
            match field.end {
                FieldEnd::Delimiter => {}
                FieldEnd::Newline => break false,
                FieldEnd::EndOfStream => break true,
            }
        };

        // Only the last field can hold the `\r` of a CRLF terminator.
        let bytes = self.scanner.buffer.bytes();
        if let Some(last) = self.spans.last_mut() {
            if last.end > last.start && bytes[last.end - 1] == b'\r' {
                last.end -= 1;
            }
        }
        Ok(Assembled::Row { last })
    }
}

impl<R> Reader<R> {
    /// The row produced by the last successful [`next`](Self::next) or
    /// [`read`](Self::read), or an empty row if there is none.
    ///
    /// The row borrows the reader's buffer and is invalidated by the next
    /// call to `next` or `read`.
    #[must_use]
    pub fn fields(&self) -> Row<'_> {
        if self.spans.is_empty() {
            return Row::empty();
        }
        Row::new(self.scanner.buffer.bytes(), &self.spans)
    }

    /// The error that stopped the reader, if any. A clean end of input is not
    /// an error and returns `None`.
    #[must_use]
    pub fn err(&self) -> Option<&Error> {
        match &self.terminal {
            Some(Terminal::Failed(err)) => Some(err),
            _ => None,
        }
    }

    /// Whether the reader has stopped, by end of input or by error.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.terminal.is_some()
    }

    /// The position of the next unread byte.
    #[must_use]
    pub fn position(&self) -> Position {
        self.scanner.position()
    }

    /// A reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        self.scanner.buffer.get_ref()
    }

    /// Unwraps the reader, returning the source. Bytes already buffered but
    /// not yet returned as rows are lost.
    pub fn into_inner(self) -> R {
        self.scanner.buffer.into_inner()
    }

    fn latch(&mut self, terminal: Terminal) {
        if self.terminal.is_some() {
            return;
        }
        match &terminal {
            Terminal::EndOfStream => {
                debug!(records = self.scanner.position().record - 1, "end of stream");
            }
            Terminal::Failed(err) => {
                debug!(position = %self.scanner.position(), error = %err, "reader failed");
            }
        }
        self.terminal = Some(terminal);
    }
}
