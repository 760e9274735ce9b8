#![no_main]

use arbitrary::Arbitrary;
use csvstream::chunk_utils::ChunkedReader;
use csvstream::{Error, Reader, write_row_quoted};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    /// Read sizes the source cycles through.
    splits: Vec<u8>,
    capacity: u8,
    data: &'a [u8],
}

fn read_all(reader: &mut Reader<ChunkedReader<'_>>) -> (Vec<Vec<Vec<u8>>>, Option<Error>) {
    let mut rows = Vec::new();
    loop {
        match reader.read() {
            Ok(Some(row)) => {
                assert!(!row.is_empty(), "rows always have a field");
                for field in &row {
                    assert!(std::str::from_utf8(field).is_ok(), "fields are UTF-8");
                }
                rows.push(row.to_vec());
            }
            Ok(None) => return (rows, None),
            Err(err) => return (rows, Some(err)),
        }
    }
}

fn check(input: &Input<'_>) {
    let splits: Vec<usize> = input.splits.iter().map(|&s| usize::from(s)).collect();

    let mut whole = Reader::new(ChunkedReader::with_splits(input.data, &[]));
    let mut split = Reader::with_capacity(
        ChunkedReader::with_splits(input.data, &splits),
        usize::from(input.capacity),
    );
    let (rows, err) = read_all(&mut whole);
    let (split_rows, split_err) = read_all(&mut split);

    // Chunking never changes the outcome.
    assert_eq!(rows, split_rows);
    assert_eq!(err, split_err);

    // The terminal state is latched.
    assert!(whole.read().is_err() == err.is_some());
    assert!(!whole.next());

    // Quoting what was read and reading it again is lossless, except for a
    // trailing `\r` in a row's last field, which the reader drops.
    if err.is_none() && !rows.iter().any(|r| r.last().is_some_and(|f| f.ends_with(b"\r"))) {
        let mut encoded = Vec::new();
        for row in &rows {
            write_row_quoted(row, &mut encoded);
        }
        let mut again = Reader::new(ChunkedReader::with_splits(&encoded, &splits));
        let (reread, reread_err) = read_all(&mut again);
        assert!(reread_err.is_none());
        assert_eq!(rows, reread);
    }
}

fuzz_target!(|input: Input<'_>| check(&input));
