use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tracing::debug;

use crate::codec::block::BlockInfo;
use crate::codec::column::{ColumnDescriptor, TypeRegistry};
use crate::codec::compression::{MAX_FRAME_PAYLOAD, write_lz4_frames};
use crate::codec::cursor::WireSink;
use crate::codec::errors::CodecError;
use crate::codec::settings::{CodecSettings, Compression};
use crate::codec::types::Value;
use crate::codec::writer::ColumnWriter;

/// Row-oriented insert encoder. Writers are derived once and reused per row range.
#[derive(Debug)]
pub struct BlockWriter {
    settings: Arc<CodecSettings>,
    descriptors: Vec<Arc<ColumnDescriptor>>,
    writers: Vec<ColumnWriter>,
    rows: Vec<Vec<Value>>,
}

impl BlockWriter {
    pub fn new(
        registry: &TypeRegistry,
        descriptors: Vec<ColumnDescriptor>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, CodecError> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != descriptors.len())
        {
            return Err(CodecError::ValueOutOfRange(format!(
                "row {index} has {} values for {} columns",
                row.len(),
                descriptors.len()
            )));
        }
        let descriptors: Vec<_> = descriptors.into_iter().map(Arc::new).collect();
        let writers = descriptors
            .iter()
            .enumerate()
            .map(|(index, d)| registry.writer(d.clone(), index))
            .collect();
        Ok(Self {
            settings: registry.settings().clone(),
            descriptors,
            writers,
            rows,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn descriptors(&self) -> &[Arc<ColumnDescriptor>] {
        &self.descriptors
    }

    /// Emits rows `[from, to)` as one block, wrapped in LZ4 frames when the session
    /// compresses. Nothing reaches `sink` if any value fails to encode.
    pub fn serialize<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        from: usize,
        to: usize,
    ) -> Result<(), CodecError> {
        if from > to || to > self.rows.len() {
            return Err(CodecError::ValueOutOfRange(format!(
                "rows {from}..{to} outside 0..{}",
                self.rows.len()
            )));
        }
        let mut out = BytesMut::new();
        if self.settings.has_block_info() {
            BlockInfo::default().write(&mut out);
        }
        out.put_varint(self.descriptors.len() as u64);
        out.put_varint((to - from) as u64);
        for (descriptor, writer) in self.descriptors.iter().zip(&self.writers) {
            out.put_pascal_string(descriptor.name());
            out.put_pascal_string(descriptor.raw_type());
            writer.serialize_rows(&mut out, &self.rows, from, to)?;
        }
        debug!(
            rows = to - from,
            columns = self.descriptors.len(),
            bytes = out.len(),
            "block encoded"
        );
        match self.settings.compression {
            Compression::None => sink.put_slice(&out),
            Compression::Lz4 => write_lz4_frames(sink, &out, MAX_FRAME_PAYLOAD),
        }
        Ok(())
    }

    /// Whole row set as one block.
    pub fn serialize_all<B: BufMut + ?Sized>(&self, sink: &mut B) -> Result<(), CodecError> {
        self.serialize(sink, 0, self.rows.len())
    }
}
