//! A streaming, low-allocation CSV reader.
//!
//! [`Reader`] pulls bytes from any [`std::io::Read`] source into one growable
//! buffer and splits them into rows of fields. Quoted fields, embedded
//! delimiters and newlines, `""` escapes and CRLF line endings are handled;
//! input must be UTF-8. Rows are borrowed views into the reader's buffer, so
//! reading a file allocates only as the longest record demands.
//!
//! ```rust
//! use csvstream::Reader;
//!
//! let input = "Language,Sponsor\n\"rust\",\"Mozilla, then the Foundation\"\r\n";
//! let mut reader = Reader::new(input.as_bytes());
//!
//! let header = reader.read()?.expect("header row").to_strings();
//! assert_eq!(header, ["Language", "Sponsor"]);
//!
//! let row = reader.read()?.expect("data row");
//! assert_eq!(row, ["rust", "Mozilla, then the Foundation"]);
//!
//! assert!(reader.read()?.is_none());
//! # Ok::<(), csvstream::Error>(())
//! ```

mod buffer;
#[doc(hidden)]
pub mod chunk_utils;
mod decode;
mod error;
mod quote;
mod reader;
mod row;
mod scanner;

#[cfg(test)]
mod tests;

pub use error::{Error, Position};
pub use quote::{quote_into, write_row_quoted};
pub use reader::Reader;
pub use row::{Fields, Row};
