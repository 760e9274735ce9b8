use core::fmt;
use core::iter::FusedIterator;
use core::ops::Range;
use core::slice;

use bstr::BStr;

/// One record, borrowed from a [`Reader`](crate::Reader).
///
/// A `Row` is a view: its fields are ranges of the reader's internal buffer,
/// which is compacted and unescaped in place as the next record is scanned.
/// The borrow ends at the next call to [`Reader::read`](crate::Reader::read)
/// or [`Reader::next`](crate::Reader::next); copy out anything that must
/// outlive it with [`Row::to_vec`] or [`Row::to_strings`].
///
/// Every field is valid UTF-8.
#[derive(Clone, Copy)]
pub struct Row<'r> {
    bytes: &'r [u8],
    spans: &'r [Range<usize>],
}

impl<'r> Row<'r> {
    pub(crate) fn new(bytes: &'r [u8], spans: &'r [Range<usize>]) -> Self {
        Self { bytes, spans }
    }

    pub(crate) const fn empty() -> Row<'static> {
        Row {
            bytes: &[],
            spans: &[],
        }
    }

    /// Number of fields in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether the row has no fields. Rows returned by the reader always have
    /// at least one; only [`Reader::fields`](crate::Reader::fields) can return
    /// an empty row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The field at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'r BStr> {
        self.spans
            .get(index)
            .map(|span| BStr::new(&self.bytes[span.clone()]))
    }

    /// The field at `index` as text.
    #[must_use]
    pub fn str(&self, index: usize) -> Option<&'r str> {
        self.get(index)
            .and_then(|field| core::str::from_utf8(field).ok())
    }

    /// Iterates over the fields in column order.
    #[must_use]
    pub fn iter(&self) -> Fields<'r> {
        Fields {
            bytes: self.bytes,
            spans: self.spans.iter(),
        }
    }

    /// Copies every field out of the reader's buffer.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Vec<u8>> {
        self.iter().map(|field| field.to_vec()).collect()
    }

    /// Copies every field out of the reader's buffer as a `String`.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(|field| field.to_string()).collect()
    }
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'r> IntoIterator for Row<'r> {
    type Item = &'r BStr;
    type IntoIter = Fields<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'r> IntoIterator for &Row<'r> {
    type Item = &'r BStr;
    type IntoIter = Fields<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: AsRef<[u8]>> PartialEq<[S]> for Row<'_> {
    fn eq(&self, other: &[S]) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(field, expected)| {
                    let expected: &[u8] = expected.as_ref();
                    field == expected
                })
    }
}

impl<S: AsRef<[u8]>, const N: usize> PartialEq<[S; N]> for Row<'_> {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

/// Iterator over the fields of a [`Row`].
#[derive(Debug, Clone)]
pub struct Fields<'r> {
    bytes: &'r [u8],
    spans: slice::Iter<'r, Range<usize>>,
}

impl<'r> Iterator for Fields<'r> {
    type Item = &'r BStr;

    fn next(&mut self) -> Option<Self::Item> {
        self.spans
            .next()
            .map(|span| BStr::new(&self.bytes[span.clone()]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl DoubleEndedIterator for Fields<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.spans
            .next_back()
            .map(|span| BStr::new(&self.bytes[span.clone()]))
    }
}

impl ExactSizeIterator for Fields<'_> {}

impl FusedIterator for Fields<'_> {}
