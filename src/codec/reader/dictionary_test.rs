use bytes::{BufMut, BytesMut};

use crate::codec::column::format::{HAS_ADDITIONAL_KEYS_BIT, NEED_GLOBAL_DICTIONARY_BIT};
use crate::codec::column::{ColumnData, ColumnValues, Representation};
use crate::codec::cursor::WireSink;
use crate::codec::errors::CodecError;
use crate::codec::reader::ColumnReader;
use crate::codec::types::Value;
use crate::test_helpers::chunked::read_column_bytewise;
use crate::test_helpers::factories::{DescriptorFactory, RegistryFactory};

fn reader(spec: &str, rows: usize) -> ColumnReader {
    RegistryFactory::new()
        .create()
        .reader(DescriptorFactory::of(spec), rows)
}

/// `LowCardinality(Nullable(String))` rows `x, y, x, NULL`.
fn nullable_strings() -> BytesMut {
    let mut b = BytesMut::new();
    b.put_u64_le(1);
    b.put_u64_le(HAS_ADDITIONAL_KEYS_BIT);
    b.put_u64_le(3);
    b.put_pascal_string("");
    b.put_pascal_string("x");
    b.put_pascal_string("y");
    b.put_u64_le(4);
    b.put_slice(&[1, 2, 1, 0]);
    b
}

#[test]
fn nullable_dictionary_resolves_slot_zero_to_null() {
    let column = read_column_bytewise(
        reader("LowCardinality(Nullable(String))", 4),
        &nullable_strings(),
    );

    let ColumnData::Dictionary { dictionary, keys } = column.data() else {
        panic!("expected dictionary data");
    };
    assert_eq!(dictionary.rows(), 3);
    assert_eq!(keys, &ColumnValues::U8(vec![1, 2, 1, 0]));
    assert_eq!(
        column.values(Representation::Native).unwrap(),
        vec![Value::from("x"), Value::from("y"), Value::from("x"), Value::Null]
    );
}

#[test]
fn wide_keys_follow_the_width_code() {
    let mut b = BytesMut::new();
    b.put_u64_le(1);
    b.put_u64_le(HAS_ADDITIONAL_KEYS_BIT | 1);
    b.put_u64_le(2);
    b.put_u32_le(10);
    b.put_u32_le(20);
    b.put_u64_le(3);
    for key in [1u16, 0, 1] {
        b.put_u16_le(key);
    }

    let mut r = reader("LowCardinality(UInt32)", 3);
    assert!(r.read(&mut b).unwrap());
    assert!(b.is_empty());
    assert_eq!(
        r.finish().unwrap().values(Representation::Native).unwrap(),
        vec![Value::UInt32(20), Value::UInt32(10), Value::UInt32(20)]
    );
}

#[test]
fn global_dictionary_is_rejected() {
    let mut b = BytesMut::new();
    b.put_u64_le(1);
    b.put_u64_le(HAS_ADDITIONAL_KEYS_BIT | NEED_GLOBAL_DICTIONARY_BIT);
    b.put_u64_le(0);

    let err = reader("LowCardinality(String)", 1).read(&mut b).unwrap_err();
    assert!(matches!(err, CodecError::ProtocolStateError(_)));
}

#[test]
fn unknown_keys_version_is_rejected() {
    let mut b = BytesMut::new();
    b.put_u64_le(2);
    let err = reader("LowCardinality(String)", 1).read(&mut b).unwrap_err();
    assert!(matches!(err, CodecError::ProtocolStateError(_)));
}

#[test]
fn row_count_must_match_block() {
    let err = reader("LowCardinality(Nullable(String))", 5)
        .read(&mut nullable_strings())
        .unwrap_err();
    assert!(matches!(err, CodecError::ProtocolStateError(_)));
}

#[test]
fn key_outside_dictionary_is_rejected() {
    let mut b = BytesMut::new();
    b.put_u64_le(1);
    b.put_u64_le(HAS_ADDITIONAL_KEYS_BIT);
    b.put_u64_le(1);
    b.put_pascal_string("only");
    b.put_u64_le(2);
    b.put_slice(&[0, 1]);

    let err = reader("LowCardinality(String)", 2).read(&mut b).unwrap_err();
    assert!(matches!(err, CodecError::ProtocolStateError(_)));
}

#[test]
fn oversized_dictionary_is_a_limit_error() {
    let mut b = BytesMut::new();
    b.put_u64_le(1);
    b.put_u64_le(HAS_ADDITIONAL_KEYS_BIT | 3);
    b.put_u64_le(i32::MAX as u64 + 1);

    let err = reader("LowCardinality(String)", 1).read(&mut b).unwrap_err();
    assert!(matches!(err, CodecError::ProtocolLimitExceeded(_)));
}
