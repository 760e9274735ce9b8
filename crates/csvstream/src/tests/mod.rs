
use crate::Reader;
use crate::chunk_utils::ChunkedReader;

/// Reads every row of `input` with the given read sizes, copying fields out.
pub(crate) fn read_all(input: &[u8], splits: &[usize]) -> Result<Vec<Vec<String>>, crate::Error> {
    let mut reader = Reader::with_capacity(ChunkedReader::with_splits(input, splits), 4);
    let mut rows = Vec::new();
    while let Some(row) = reader.read()? {
        rows.push(row.to_strings());
    }
    Ok(rows)
}

pub(crate) fn test_count() -> u64 {
    if cfg!(feature = "test-fast") {
        50
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
