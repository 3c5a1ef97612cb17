//! Integration tests for ByteReader

use intvm_container::{ByteReader, InstructionStream};
use intvm_foundation::ErrorKind;

#[test]
fn reads_words_and_immediates_in_order() {
    let mut reader = ByteReader::new(vec![0x01, 0xC0, 0xFF, 0xFF, 0xFF, 0xFF, 0x1C, 0x80]);
    assert_eq!(reader.read16().unwrap(), 0xC001);
    assert_eq!(reader.read32().unwrap(), -1);
    assert_eq!(reader.read16().unwrap(), 0x801C);
    assert_eq!(reader.offset(), 8);
}

#[test]
fn seek_repositions_the_cursor() {
    let mut reader = ByteReader::from(&[0x10, 0x80, 0x1C, 0x80][..]);
    reader.seek(2).unwrap();
    assert_eq!(reader.read16().unwrap(), 0x801C);
    reader.seek(0).unwrap();
    assert_eq!(reader.read16().unwrap(), 0x8010);
}

#[test]
fn seek_to_end_then_read_fails() {
    let mut reader = ByteReader::new(vec![0x10, 0x80]);
    reader.seek(2).unwrap();
    let err = reader.read16().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnexpectedEndOfCode { offset: 2, len: 2 }));
}

#[test]
fn seek_past_end_is_invalid() {
    let mut reader = ByteReader::new(vec![0x10, 0x80]);
    let err = reader.seek(3).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidAddress(3)));
    assert_eq!(reader.offset(), 0);
}

#[test]
fn empty_stream() {
    let reader = ByteReader::new(Vec::new());
    assert!(reader.is_empty());
    assert_eq!(reader.len(), 0);
}
