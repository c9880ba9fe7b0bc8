use bytes::BytesMut;

use super::nulls_map::NullsMap;
use crate::codec::cursor::ByteCursor;

#[test]
fn size_for_rounds_up_to_whole_bytes() {
    assert_eq!(NullsMap::size_for(0), 0);
    assert_eq!(NullsMap::size_for(1), 1);
    assert_eq!(NullsMap::size_for(8), 1);
    assert_eq!(NullsMap::size_for(9), 2);
}

#[test]
fn flags_pack_into_bits() {
    let map = NullsMap::from_flags([false, true, false, false, false, false, false, false, true]);
    assert_eq!(map.len(), 9);
    assert!(map.is_null(1));
    assert!(map.is_null(8));
    assert!(!map.is_null(0));
    assert!(!map.is_null(42));
    assert_eq!(map.null_count(), 2);
}

#[test]
fn read_waits_for_every_flag() {
    let mut buf = BytesMut::from(&[0u8, 1][..]);
    assert!(NullsMap::read(&mut buf, 3).is_none());
    assert_eq!(buf.available(), 2);

    buf.extend_from_slice(&[1, 0xaa]);
    let map = NullsMap::read(&mut buf, 3).unwrap();
    assert_eq!(map.null_count(), 2);
    assert!(!map.is_null(0));
    assert_eq!(buf.available(), 1);
}

#[test]
fn write_emits_one_byte_per_row() {
    let mut out = BytesMut::new();
    NullsMap::write(&mut out, [true, false, true]);
    assert_eq!(&out[..], &[1, 0, 1]);
}
