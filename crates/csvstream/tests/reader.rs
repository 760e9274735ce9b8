#![allow(missing_docs)]

mod common;

use std::io;

use csvstream::chunk_utils::ChunkedReader;
use csvstream::{Error, Reader};
use quickcheck_macros::quickcheck;
use rstest::rstest;

use crate::common::rows;

#[rstest]
#[case::one_row("abc,def,ghi", vec![vec!["abc", "def", "ghi"]])]
#[case::two_rows("abc,def\n1234,56", vec![vec!["abc", "def"], vec!["1234", "56"]])]
#[case::quoted("\"abc\",\"123\",\"456\"", vec![vec!["abc", "123", "456"]])]
#[case::quoted_rows("\"abc\",\"123\"\n\"def\",\"456\"", vec![vec!["abc", "123"], vec!["def", "456"]])]
#[case::quoted_commas("\"a,b,c\",\"d,e,f\"", vec![vec!["a,b,c", "d,e,f"]])]
#[case::quoted_newlines("\"a\nb\nc\"", vec![vec!["a\nb\nc"]])]
#[case::escaped_quote("\"a\"\"b\"", vec![vec!["a\"b"]])]
#[case::trailing_terminator("a,b,c\n", vec![vec!["a", "b", "c"]])]
#[case::blank_line("a,b\n\nc,d", vec![vec!["a", "b"], vec![""], vec!["c", "d"]])]
#[case::crlf("a,b,c\r\nd,e,f", vec![vec!["a", "b", "c"], vec!["d", "e", "f"]])]
#[case::crlf_trailing("a,b\r\n", vec![vec!["a", "b"]])]
#[case::crlf_after_quote("\"a\",\"b\"\r\n\"c\"\r\n", vec![vec!["a", "b"], vec!["c"]])]
#[case::empty_input("", vec![])]
#[case::only_terminator("\n", vec![vec![""]])]
#[case::two_terminators("\n\n", vec![vec![""], vec![""]])]
#[case::empty_fields(",,\n,", vec![vec!["", "", ""], vec!["", ""]])]
#[case::trailing_delimiter_at_end("a,", vec![vec!["a", ""]])]
#[case::unterminated_quote("\"abc,def\nx", vec![vec!["abc,def\nx"]])]
#[case::lone_quote_tolerated("\"ab\"cd\",e", vec![vec!["abcd", "e"]])]
#[case::quote_inside_unquoted("ab\"c,d", vec![vec!["ab\"c", "d"]])]
#[case::multibyte("ünï,\"cø,dé\",🦀", vec![vec!["ünï", "cø,dé", "🦀"]])]
fn reads_rows(#[case] input: &str, #[case] expected: Vec<Vec<&str>>, #[values(1, 2, 3, 7, 4096)] chunk: usize) {
    assert_eq!(rows(input, chunk), expected);
}

#[test]
fn mixed_apis_share_state() {
    let mut r = Reader::new(&b"a\nb\nc\nd"[..]);
    assert_eq!(r.read().unwrap().unwrap(), ["a"]);
    assert!(r.next());
    assert_eq!(r.fields(), ["b"]);
    assert_eq!(r.read().unwrap().unwrap(), ["c"]);
    assert_eq!(r.fields(), ["c"]);
    assert!(r.next());
    assert_eq!(r.fields(), ["d"]);
    assert!(r.read().unwrap().is_none());
    assert!(!r.next());
    assert!(r.err().is_none());
}

#[test]
fn end_of_stream_is_idempotent_and_stops_reading() {
    let mut source = ChunkedReader::new(b"x,y\n", 1);
    source.fail_after_end();
    let mut r = Reader::new(source);
    assert_eq!(r.read().unwrap().unwrap(), ["x", "y"]);
    for _ in 0..3 {
        assert!(r.read().unwrap().is_none());
        assert!(!r.next());
        assert!(r.err().is_none());
    }
}

#[test]
fn io_error_is_surfaced_and_latched() {
    let source = ChunkedReader::failing(b"a,b\n", io::ErrorKind::UnexpectedEof);
    let mut r = Reader::new(source);
    assert_eq!(r.read().unwrap().unwrap(), ["a", "b"]);
    let err = r.read().unwrap_err();
    match &err {
        Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert_eq!(r.read().unwrap_err(), err);
    assert!(!r.next());
    assert_eq!(r.err(), Some(&err));
}

#[test]
fn invalid_utf8_is_an_error() {
    let mut r = Reader::new(&b"a,\xF0\x28\x8C\x28\n"[..]);
    let err = r.read().unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8 { .. }));
    assert_eq!(err.position().map(|p| p.byte), Some(2));
    assert!(r.is_done());
}

#[test]
fn rows_can_be_copied_out() {
    let mut r = Reader::new(&b"one,two\nthree\n"[..]);
    let mut kept = Vec::new();
    while let Some(row) = r.read().unwrap() {
        kept.push(row.to_vec());
    }
    assert_eq!(kept, vec![vec![b"one".to_vec(), b"two".to_vec()], vec![b"three".to_vec()]]);
}

#[test]
fn row_accessors() {
    let mut r = Reader::new("id,\"näme\"\n".as_bytes());
    let row = r.read().unwrap().unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(row.str(1), Some("näme"));
    assert_eq!(row.get(0).unwrap(), "id");
    let collected: Vec<String> = row.into_iter().map(ToString::to_string).collect();
    assert_eq!(collected, ["id", "näme"]);
}

#[quickcheck]
fn chunk_size_does_not_change_rows(text: String, chunk: usize) -> bool {
    rows(&text, chunk) == rows(&text, usize::MAX)
}
