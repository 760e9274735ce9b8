//! Writing fields in the quoted form the reader accepts.

/// Appends `field` to `out` wrapped in `"`, doubling any `"` inside it.
///
/// Reading the result back yields `field` unchanged, whatever it contains.
///
/// ```rust
/// let mut out = Vec::new();
/// csvstream::quote_into(br#"say "hi""#, &mut out);
/// assert_eq!(out, br#""say ""hi""""#);
/// ```
pub fn quote_into(field: &[u8], out: &mut Vec<u8>) {
    out.reserve(field.len() + 2);
    out.push(b'"');
    for part in field.split_inclusive(|&b| b == b'"') {
        out.extend_from_slice(part);
        if part.last() == Some(&b'"') {
            out.push(b'"');
        }
    }
    out.push(b'"');
}

/// Appends one record to `out` with every field quoted, fields joined by `,`
/// and a trailing `\n`.
pub fn write_row_quoted<I, F>(fields: I, out: &mut Vec<u8>)
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        quote_into(field.as_ref(), out);
    }
    out.push(b'\n');
}
