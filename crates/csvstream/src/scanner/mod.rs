//! Field scanner: the per-field state machine.
//!
//! A field is scanned in one of two modes, chosen by its first rune:
//!
//! - **Unquoted** fields run up to the next `,`, `\n` or end-of-stream and are
//!   a plain sub-range of the buffer.
//! - **Quoted** fields drop the opening quote and are unescaped in place: a
//!   write cursor trails the read cursor and every kept rune is copied back to
//!   it, so `""` collapses to `"` without allocating.
//!
//! Inside a quoted field a lone `"` is held as a pending close. It closes the
//! field when followed by `,`, `\n`, `\r\n` or end-of-stream, becomes one
//! literal quote when followed by another `"`, and is otherwise dropped while
//! the next rune is kept. Malformed quoting is tolerated, never rejected.
//!
//! The scanner owns the [`Buffer`] and the line counter. Field ranges it
//! returns index into [`Buffer::bytes`] and stay valid until the next
//! [`Scanner::reset`].

use std::io::Read;
use std::ops::Range;

use crate::buffer::Buffer;
use crate::decode::{Fault, Rune};
use crate::error::{Error, Position};


const DELIMITER: char = ',';
const QUOTE: char = '"';
const NEWLINE: char = '\n';
const CARRIAGE_RETURN: char = '\r';

/// What stopped a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldEnd {
    /// A delimiter; the row continues.
    Delimiter,
    /// A record terminator; the row is complete.
    Newline,
    /// The source ran dry; the row is complete and no more follow.
    EndOfStream,
}

impl FieldEnd {
    #[cfg(test)]
    pub(crate) fn ends_row(self) -> bool {
        !matches!(self, FieldEnd::Delimiter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    pub span: Range<usize>,
    pub end: FieldEnd,
}

#[derive(Debug)]
pub(crate) struct Scanner<R> {
    pub(crate) buffer: Buffer<R>,
    line: u64,
    record: u64,
}

impl<R> Scanner<R> {
    pub(crate) fn new(buffer: Buffer<R>) -> Self {
        let start = Position::start();
        Self {
            buffer,
            line: start.line,
            record: start.record,
        }
    }

    /// Discards the bytes of the previous row.
    pub(crate) fn reset(&mut self) {
        self.buffer.reset();
    }

    /// Marks the current record as complete.
    pub(crate) fn finish_record(&mut self) {
        self.record += 1;
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            byte: self.buffer.offset(),
            line: self.line,
            record: self.record,
        }
    }

    fn fault(&self, fault: Fault) -> Error {
        match fault {
            Fault::Io(err) => Error::from(err),
            Fault::InvalidUtf8 => Error::InvalidUtf8 {
                position: self.position(),
            },
        }
    }
}

impl<R: Read> Scanner<R> {
    fn peek(&mut self) -> Result<Option<Rune>, Error> {
        self.buffer.peek().map_err(|fault| self.fault(fault))
    }

    fn consume(&mut self) -> Result<Option<Rune>, Error> {
        let rune = self.buffer.consume().map_err(|fault| self.fault(fault))?;
        if matches!(rune, Some(Rune { ch: NEWLINE, .. })) {
            self.line += 1;
        }
        Ok(rune)
    }

    /// Scans the next field.
    ///
    /// At end-of-stream a row that has not produced any field yet has nothing
    /// left to scan and `Ok(None)` is returned. Past a delimiter, end-of-stream
    /// still yields one final empty field, so `a,` reads the same as `a,\n`.
    pub(crate) fn next_field(&mut self, row_start: bool) -> Result<Option<Field>, Error> {
        match self.peek()? {
            None if row_start => Ok(None),
            None => {
                let at = self.buffer.cursor;
                Ok(Some(Field {
                    span: at..at,
                    end: FieldEnd::EndOfStream,
                }))
            }
            Some(Rune { ch: QUOTE, width }) => {
                self.buffer.cursor += width;
                self.quoted().map(Some)
            }
            Some(_) => self.unquoted().map(Some),
        }
    }

    fn unquoted(&mut self) -> Result<Field, Error> {
        let start = self.buffer.cursor;
        loop {
            let Some(rune) = self.consume()? else {
                return Ok(Field {
                    span: start..self.buffer.cursor,
                    end: FieldEnd::EndOfStream,
                });
            };
            let end = match rune.ch {
                DELIMITER => FieldEnd::Delimiter,
                NEWLINE => FieldEnd::Newline,
                _ => continue,
            };
            return Ok(Field {
                span: start..self.buffer.cursor - rune.width,
                end,
            });
        }
    }

    /// Scans a quoted field whose opening quote is already consumed.
    fn quoted(&mut self) -> Result<Field, Error> {
        let start = self.buffer.cursor;
        let mut write = start;
        let mut pending_close = false;

        loop {
            let Some(rune) = self.consume()? else {
                return Ok(Field {
                    span: start..write,
                    end: FieldEnd::EndOfStream,
                });
            };

            if pending_close {
                match rune.ch {
                    DELIMITER => {
                        return Ok(Field {
                            span: start..write,
                            end: FieldEnd::Delimiter,
                        });
                    }
                    NEWLINE => {
                        return Ok(Field {
                            span: start..write,
                            end: FieldEnd::Newline,
                        });
                    }
                    CARRIAGE_RETURN if self.peek()?.is_some_and(|next| next.ch == NEWLINE) => {
                        self.consume()?;
                        return Ok(Field {
                            span: start..write,
                            end: FieldEnd::Newline,
                        });
                    }
                    _ => pending_close = false,
                }
            } else if rune.ch == QUOTE {
                pending_close = true;
                continue;
            }

            let from = self.buffer.cursor - rune.width;
            if write != from {
                self.buffer.shift(from..self.buffer.cursor, write);
            }
            write += rune.width;
        }
    }
}
