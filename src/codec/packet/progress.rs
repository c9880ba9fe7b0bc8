use bytes::BufMut;

use crate::codec::cursor::{ByteCursor, WireSink, read_whole};
use crate::codec::errors::CodecError;
use crate::codec::settings::{
    REVISION_WITH_CLIENT_WRITE_INFO, REVISION_WITH_TOTAL_ROWS_IN_PROGRESS,
};

/// Query progress counters; fields absent at older revisions stay zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub rows: u64,
    pub bytes: u64,
    pub total_rows: u64,
    pub written_rows: u64,
    pub written_bytes: u64,
}

impl Progress {
    pub fn read<C: ByteCursor>(cursor: &mut C, revision: u64) -> Result<Option<Self>, CodecError> {
        read_whole(cursor, |view| {
            let mut progress = Progress::default();
            let Some(rows) = view.read_varint()? else {
                return Ok(None);
            };
            let Some(bytes) = view.read_varint()? else {
                return Ok(None);
            };
            progress.rows = rows;
            progress.bytes = bytes;
            if revision >= REVISION_WITH_TOTAL_ROWS_IN_PROGRESS {
                let Some(total) = view.read_varint()? else {
                    return Ok(None);
                };
                progress.total_rows = total;
            }
            if revision >= REVISION_WITH_CLIENT_WRITE_INFO {
                let Some(written_rows) = view.read_varint()? else {
                    return Ok(None);
                };
                let Some(written_bytes) = view.read_varint()? else {
                    return Ok(None);
                };
                progress.written_rows = written_rows;
                progress.written_bytes = written_bytes;
            }
            Ok(Some(progress))
        })
    }

    pub fn write<B: BufMut + ?Sized>(&self, sink: &mut B, revision: u64) {
        sink.put_varint(self.rows);
        sink.put_varint(self.bytes);
        if revision >= REVISION_WITH_TOTAL_ROWS_IN_PROGRESS {
            sink.put_varint(self.total_rows);
        }
        if revision >= REVISION_WITH_CLIENT_WRITE_INFO {
            sink.put_varint(self.written_rows);
            sink.put_varint(self.written_bytes);
        }
    }
}
