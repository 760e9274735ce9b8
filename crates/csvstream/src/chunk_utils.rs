//! Helpers for feeding input in pieces.
//!
//! Real sources rarely hand over a whole record per read. These helpers split
//! payloads at arbitrary byte offsets (including inside multi-byte UTF-8
//! sequences) so tests, benchmarks and the fuzzer can exercise every refill
//! path of the reader.

use std::io::{self, Read};

/// Split `payload` into approximately equal-sized chunks. Unlike text
/// splitting, chunk ends may fall inside a UTF-8 sequence.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// An [`io::Read`] source that returns at most a fixed sequence of chunk
/// sizes per call, optionally failing once the data runs out.
#[derive(Debug, Clone)]
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    sizes: Vec<usize>,
    next_size: usize,
    reads: usize,
    failure: Option<io::ErrorKind>,
    interrupt_first: bool,
    fail_after_end: bool,
    ended: bool,
}

impl<'a> ChunkedReader<'a> {
    /// Reads `data` at most `chunk` bytes at a time. A zero `chunk` is
    /// treated as one.
    #[must_use]
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self::with_splits(data, &[chunk])
    }

    /// Reads `data` in chunks whose sizes cycle through `splits`. Zero sizes
    /// are treated as one; an empty `splits` reads everything at once.
    #[must_use]
    pub fn with_splits(data: &'a [u8], splits: &[usize]) -> Self {
        let sizes = if splits.is_empty() {
            vec![usize::MAX]
        } else {
            splits.iter().map(|&s| s.max(1)).collect()
        };
        Self {
            data,
            sizes,
            next_size: 0,
            reads: 0,
            failure: None,
            interrupt_first: false,
            fail_after_end: false,
            ended: false,
        }
    }

    /// Reads `data` in full, then fails with `kind` on every later call.
    #[must_use]
    pub fn failing(data: &'a [u8], kind: io::ErrorKind) -> Self {
        let mut reader = Self::with_splits(data, &[]);
        reader.failure = Some(kind);
        reader
    }

    /// Makes the first call fail with [`io::ErrorKind::Interrupted`].
    pub fn interrupt_first_read(&mut self) {
        self.interrupt_first = true;
    }

    /// Makes any call after the end-of-stream report an error, to catch
    /// consumers that keep reading.
    pub fn fail_after_end(&mut self) {
        self.fail_after_end = true;
    }

    /// Number of `read` calls made so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        if self.interrupt_first && self.reads == 1 {
            return Err(io::ErrorKind::Interrupted.into());
        }
        if self.ended && self.fail_after_end {
            return Err(io::Error::other("read after end of stream"));
        }
        if self.data.is_empty() {
            if let Some(kind) = self.failure {
                return Err(io::Error::new(kind, "source failed"));
            }
            self.ended = true;
            return Ok(0);
        }

        let size = self.sizes[self.next_size % self.sizes.len()];
        self.next_size += 1;
        let n = size.min(buf.len()).min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        buf[..n].copy_from_slice(head);
        self.data = tail;
        Ok(n)
    }
}
