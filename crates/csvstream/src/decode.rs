//! Incremental UTF-8 decoding over the buffer's unread bytes.
//!
//! [`decode_char`] looks at a byte slice and reports one of three outcomes:
//! a scalar and its width, a request for more bytes, or an invalid sequence.
//! [`Buffer::peek`] and [`Buffer::consume`] layer refills on top of it, so
//! the decoder itself never deals with I/O.

use std::io::{self, Read};

use crate::buffer::{Buffer, Fill};

/// One decoded scalar value and its encoded width in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rune {
    pub ch: char,
    pub width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    Rune(Rune),
    /// The bytes so far are a valid prefix of a longer sequence.
    Incomplete,
    Invalid,
}

/// Why the decoder could not produce a rune.
#[derive(Debug)]
pub(crate) enum Fault {
    Io(io::Error),
    InvalidUtf8,
}

/// Decodes the first scalar value of `bytes`.
pub(crate) fn decode_char(bytes: &[u8]) -> Decoded {
    let Some(&lead) = bytes.first() else {
        return Decoded::Incomplete;
    };
    if lead.is_ascii() {
        return Decoded::Rune(Rune {
            ch: char::from(lead),
            width: 1,
        });
    }

    let window = &bytes[..bytes.len().min(4)];
    let valid = match core::str::from_utf8(window) {
        Ok(s) => s,
        Err(err) if err.valid_up_to() > 0 => {
            match core::str::from_utf8(&window[..err.valid_up_to()]) {
                Ok(s) => s,
                Err(_) => return Decoded::Invalid,
            }
        }
        Err(err) => {
            return match err.error_len() {
                None => Decoded::Incomplete,
                Some(_) => Decoded::Invalid,
            };
        }
    };

    match valid.chars().next() {
        Some(ch) => Decoded::Rune(Rune {
            ch,
            width: ch.len_utf8(),
        }),
        None => Decoded::Incomplete,
    }
}

impl<R: Read> Buffer<R> {
    /// Decodes the rune at the cursor without consuming it.
    ///
    /// Returns `Ok(None)` at end-of-stream. A sequence cut short by
    /// end-of-stream is invalid.
    pub(crate) fn peek(&mut self) -> Result<Option<Rune>, Fault> {
        loop {
            match decode_char(self.unread()) {
                Decoded::Rune(rune) => return Ok(Some(rune)),
                Decoded::Invalid => return Err(Fault::InvalidUtf8),
                Decoded::Incomplete => match self.more().map_err(Fault::Io)? {
                    Fill::Appended(_) => {}
                    Fill::EndOfStream if self.unread().is_empty() => return Ok(None),
                    Fill::EndOfStream => return Err(Fault::InvalidUtf8),
                },
            }
        }
    }

    /// Decodes the rune at the cursor and moves past it.
    #[inline]
    pub(crate) fn consume(&mut self) -> Result<Option<Rune>, Fault> {
        let rune = self.peek()?;
        if let Some(rune) = rune {
            self.cursor += rune.width;
        }
        Ok(rune)
    }
}
