use bytes::BufMut;

use crate::codec::cursor::{ByteCursor, WireSink, read_whole};
use crate::codec::errors::CodecError;

const FIELD_END: u64 = 0;
const FIELD_IS_OVERFLOWS: u64 = 1;
const FIELD_BUCKET_NUM: u64 = 2;

/// Per-block header used by distributed aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub is_overflows: bool,
    pub bucket_num: i32,
}

impl Default for BlockInfo {
    fn default() -> Self {
        Self {
            is_overflows: false,
            bucket_num: -1,
        }
    }
}

impl BlockInfo {
    /// Reads the tagged field list only once it is buffered in full.
    pub fn read<C: ByteCursor>(cursor: &mut C) -> Result<Option<Self>, CodecError> {
        read_whole(cursor, |view| {
            let mut info = BlockInfo::default();
            loop {
                let Some(field) = view.read_varint()? else {
                    return Ok(None);
                };
                match field {
                    FIELD_END => return Ok(Some(info)),
                    FIELD_IS_OVERFLOWS => match view.read_u8() {
                        Some(flag) => info.is_overflows = flag != 0,
                        None => return Ok(None),
                    },
                    FIELD_BUCKET_NUM => match view.read_i32_le() {
                        Some(bucket) => info.bucket_num = bucket,
                        None => return Ok(None),
                    },
                    other => {
                        return Err(CodecError::ProtocolStateError(format!(
                            "unknown block info field {other}"
                        )));
                    }
                }
            }
        })
    }

    pub fn write<B: BufMut + ?Sized>(&self, sink: &mut B) {
        sink.put_varint(FIELD_IS_OVERFLOWS);
        sink.put_u8(u8::from(self.is_overflows));
        sink.put_varint(FIELD_BUCKET_NUM);
        sink.put_i32_le(self.bucket_num);
        sink.put_varint(FIELD_END);
    }
}
