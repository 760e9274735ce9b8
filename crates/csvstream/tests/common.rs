#![allow(missing_docs)]
#![allow(dead_code)]

use std::fmt::Write;

use csvstream::Reader;
use csvstream::chunk_utils::ChunkedReader;

/// Reads every row of `input`, `chunk` bytes per source read.
pub fn rows(input: &str, chunk: usize) -> Vec<Vec<String>> {
    let mut reader = Reader::new(ChunkedReader::new(input.as_bytes(), chunk));
    let mut out = Vec::new();
    while let Some(row) = reader.read().expect("valid input") {
        out.push(row.to_strings());
    }
    out
}

/// Renders one line per row through the cursor-style API, ending with the
/// reader's final error state.
pub fn render(input: &[u8]) -> String {
    let mut reader = Reader::with_capacity(input, 8);
    let mut out = String::new();
    while reader.next() {
        writeln!(out, "{:?}", reader.fields()).unwrap();
    }
    match reader.err() {
        Some(err) => writeln!(out, "error: {err}").unwrap(),
        None => out.push_str("eof\n"),
    }
    out
}
