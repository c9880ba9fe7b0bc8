mod array;
mod dictionary;
mod scalar;


use std::sync::Arc;

use bytes::BufMut;

pub use array::ArrayWriter;
pub use dictionary::{Dictionary, DictionaryWriter};
pub use scalar::ScalarWriter;

use crate::codec::column::{ColumnDescriptor, Shape};
use crate::codec::errors::CodecError;
use crate::codec::settings::CodecSettings;
use crate::codec::types::Value;

/// Encoder for one column, reused for every row range of an insert.
#[derive(Clone, Debug)]
pub struct ColumnWriter {
    column_index: usize,
    kind: WriterKind,
}

#[derive(Clone, Debug)]
pub enum WriterKind {
    Scalar(ScalarWriter),
    Array(ArrayWriter),
    Dictionary(DictionaryWriter),
}

impl ColumnWriter {
    pub fn new(
        descriptor: Arc<ColumnDescriptor>,
        settings: Arc<CodecSettings>,
        column_index: usize,
    ) -> Self {
        let kind = match Shape::of(&descriptor) {
            Shape::Scalar => WriterKind::Scalar(ScalarWriter::new(descriptor, settings)),
            Shape::Dictionary => {
                WriterKind::Dictionary(DictionaryWriter::new(descriptor, settings))
            }
            Shape::Array => {
                let leaf = descriptor
                    .nested()
                    .cloned()
                    .unwrap_or_else(|| Arc::new(descriptor.index_descriptor()));
                let leaf = ColumnWriter::new(leaf, settings, column_index);
                WriterKind::Array(ArrayWriter::new(descriptor, leaf))
            }
        };
        Self { column_index, kind }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn kind(&self) -> &WriterKind {
        &self.kind
    }

    pub fn serialize_state_prefix<B: BufMut + ?Sized>(&self, sink: &mut B) {
        match &self.kind {
            WriterKind::Scalar(_) => {}
            WriterKind::Array(w) => w.serialize_state_prefix(sink),
            WriterKind::Dictionary(w) => w.serialize_state_prefix(sink),
        }
    }

    pub fn serialize_nulls_map<B: BufMut + ?Sized>(&self, sink: &mut B, values: &[&Value]) {
        if let WriterKind::Scalar(w) = &self.kind {
            w.serialize_nulls_map(sink, values);
        }
    }

    pub fn serialize_data<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        values: &[&Value],
    ) -> Result<(), CodecError> {
        match &self.kind {
            WriterKind::Scalar(w) => w.serialize_data(sink, values),
            WriterKind::Array(w) => w.serialize_data(sink, values),
            WriterKind::Dictionary(w) => w.serialize_data(sink, values),
        }
    }

    /// Prefix, nulls map and data for `values`. An empty column writes nothing.
    pub fn serialize_column<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        values: &[&Value],
    ) -> Result<(), CodecError> {
        if values.is_empty() {
            return Ok(());
        }
        self.serialize_state_prefix(sink);
        self.serialize_nulls_map(sink, values);
        self.serialize_data(sink, values)
    }

    /// Encodes this writer's column from rows `[from, to)`.
    pub fn serialize_rows<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        rows: &[Vec<Value>],
        from: usize,
        to: usize,
    ) -> Result<(), CodecError> {
        let range = rows.get(from..to).ok_or_else(|| {
            CodecError::ValueOutOfRange(format!("rows {from}..{to} outside 0..{}", rows.len()))
        })?;
        let values = range
            .iter()
            .map(|row| {
                row.get(self.column_index).ok_or_else(|| {
                    CodecError::ValueOutOfRange(format!(
                        "row has no value for column {}",
                        self.column_index
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.serialize_column(sink, &values)
    }
}
