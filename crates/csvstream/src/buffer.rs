//! Growable byte arena between the byte source and the decoder.
//!
//! The arena is the only byte storage the reader owns. Bytes are appended at
//! the fill mark by [`Buffer::more`], consumed from the read cursor, and
//! shifted to the front by [`Buffer::reset`] once a row is done with them.
//! Quoted fields are unescaped in place with [`Buffer::shift`], so every
//! field a row hands out is a range of this arena.
//!
//! Invariants
//! - `cursor <= filled <= data.len()`.
//! - `data[..filled]` holds bytes read from the source that have not been
//!   discarded by a reset; `data[filled..]` is spare room for the next read.
//! - Once the source reports end-of-stream it is never read again.

use std::io::{self, Read};
use std::ops::Range;

use tracing::trace;

/// Result of asking the source for more bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    /// This many bytes were appended after the previous fill mark.
    Appended(usize),
    EndOfStream,
}

#[derive(Debug)]
pub(crate) struct Buffer<R> {
    source: R,
    data: Vec<u8>,
    filled: usize,
    pub(crate) cursor: usize,
    /// Bytes dropped from the front by earlier resets.
    discarded: u64,
    exhausted: bool,
}

impl<R> Buffer<R> {
    pub(crate) fn with_capacity(source: R, capacity: usize) -> Self {
        Self {
            source,
            data: vec![0; capacity],
            filled: 0,
            cursor: 0,
            discarded: 0,
            exhausted: false,
        }
    }

    /// Moves the unread bytes to the front of the arena.
    ///
    /// Every range handed out before this call is invalidated.
    pub(crate) fn reset(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.data.copy_within(self.cursor..self.filled, 0);
        self.filled -= self.cursor;
        self.discarded += self.cursor as u64;
        self.cursor = 0;
    }

    /// Bytes read from the source and not yet discarded.
    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Bytes between the read cursor and the fill mark.
    #[inline]
    pub(crate) fn unread(&self) -> &[u8] {
        &self.data[self.cursor..self.filled]
    }

    /// Copies `src` to `dest` within the arena. Used to compact quoted
    /// fields behind the read cursor.
    #[inline]
    pub(crate) fn shift(&mut self, src: Range<usize>, dest: usize) {
        debug_assert!(src.end <= self.cursor);
        debug_assert!(dest <= src.start);
        self.data.copy_within(src, dest);
    }

    /// Absolute stream offset of the read cursor.
    #[inline]
    pub(crate) fn offset(&self) -> u64 {
        self.discarded + self.cursor as u64
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.source
    }

    pub(crate) fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read> Buffer<R> {
    /// Reads from the source into the tail of the arena, doubling it first
    /// when it is full.
    ///
    /// Source failures come back unchanged. Interrupted reads are retried.
    pub(crate) fn more(&mut self) -> io::Result<Fill> {
        if self.exhausted {
            return Ok(Fill::EndOfStream);
        }
        if self.filled == self.data.len() {
            let grown = 2 * self.data.len() + 1;
            trace!(from = self.data.len(), to = grown, "growing buffer");
            self.data.resize(grown, 0);
        }

        loop {
            match self.source.read(&mut self.data[self.filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(Fill::EndOfStream);
                }
                Ok(n) => {
                    self.filled += n;
                    trace!(read = n, filled = self.filled, "refilled buffer");
                    return Ok(Fill::Appended(n));
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}
