use bytes::BufMut;

use crate::codec::cursor::{ByteCursor, WireSink, read_whole};
use crate::codec::errors::CodecError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProfileInfo {
    pub rows: u64,
    pub blocks: u64,
    pub bytes: u64,
    pub applied_limit: bool,
    pub rows_before_limit: u64,
    pub calculated_rows_before_limit: bool,
}

impl ProfileInfo {
    pub fn read<C: ByteCursor>(cursor: &mut C) -> Result<Option<Self>, CodecError> {
        read_whole(cursor, |view| {
            let (Some(rows), Some(blocks), Some(bytes)) =
                (view.read_varint()?, view.read_varint()?, view.read_varint()?)
            else {
                return Ok(None);
            };
            let Some(applied_limit) = view.read_u8() else {
                return Ok(None);
            };
            let Some(rows_before_limit) = view.read_varint()? else {
                return Ok(None);
            };
            let Some(calculated) = view.read_u8() else {
                return Ok(None);
            };
            Ok(Some(ProfileInfo {
                rows,
                blocks,
                bytes,
                applied_limit: applied_limit != 0,
                rows_before_limit,
                calculated_rows_before_limit: calculated != 0,
            }))
        })
    }

    pub fn write<B: BufMut + ?Sized>(&self, sink: &mut B) {
        sink.put_varint(self.rows);
        sink.put_varint(self.blocks);
        sink.put_varint(self.bytes);
        sink.put_u8(u8::from(self.applied_limit));
        sink.put_varint(self.rows_before_limit);
        sink.put_u8(u8::from(self.calculated_rows_before_limit));
    }
}
