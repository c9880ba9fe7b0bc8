use bytes::{BufMut, BytesMut};

use crate::codec::block::BlockInfo;
use crate::codec::errors::CodecError;

#[test]
fn default_round_trips_with_bucket_minus_one() {
    let mut out = BytesMut::new();
    BlockInfo::default().write(&mut out);
    assert_eq!(&out[..], &[1u8, 0, 2, 0xff, 0xff, 0xff, 0xff, 0]);

    let info = BlockInfo::read(&mut out).unwrap().unwrap();
    assert_eq!(info.bucket_num, -1);
    assert!(!info.is_overflows);
    assert!(out.is_empty());
}

#[test]
fn partial_header_consumes_nothing() {
    let mut out = BytesMut::new();
    BlockInfo {
        is_overflows: true,
        bucket_num: 7,
    }
    .write(&mut out);
    let mut partial = BytesMut::from(&out[..out.len() - 1]);

    assert_eq!(BlockInfo::read(&mut partial).unwrap(), None);
    assert_eq!(partial.len(), out.len() - 1);

    partial.put_u8(0);
    let info = BlockInfo::read(&mut partial).unwrap().unwrap();
    assert!(info.is_overflows);
    assert_eq!(info.bucket_num, 7);
}

#[test]
fn unknown_field_is_rejected() {
    let mut raw = BytesMut::from(&[3u8, 0][..]);
    assert!(matches!(
        BlockInfo::read(&mut raw),
        Err(CodecError::ProtocolStateError(_))
    ));
}
