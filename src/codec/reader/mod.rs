mod array;
mod dictionary;
mod scalar;
pub mod state;

#[cfg(test)]
mod dictionary_test;

use std::sync::Arc;

pub use array::ArrayReader;
pub use dictionary::DictionaryReader;
pub use scalar::ScalarReader;

use crate::codec::column::{Column, ColumnDescriptor};
use crate::codec::cursor::ByteCursor;
use crate::codec::errors::CodecError;

/// Resumable decoder for one column of one block.
#[derive(Debug)]
pub enum ColumnReader {
    Scalar(ScalarReader),
    Array(ArrayReader),
    Dictionary(DictionaryReader),
}

impl ColumnReader {
    /// Consumes what it can; `Ok(true)` once every row has been decoded.
    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<bool, CodecError> {
        match self {
            ColumnReader::Scalar(r) => r.read(cursor),
            ColumnReader::Array(r) => r.read(cursor),
            ColumnReader::Dictionary(r) => r.read(cursor),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            ColumnReader::Scalar(r) => r.is_complete(),
            ColumnReader::Array(r) => r.is_complete(),
            ColumnReader::Dictionary(r) => r.is_complete(),
        }
    }

    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        match self {
            ColumnReader::Scalar(r) => r.descriptor(),
            ColumnReader::Array(r) => r.descriptor(),
            ColumnReader::Dictionary(r) => r.descriptor(),
        }
    }

    pub fn finish(self) -> Result<Column, CodecError> {
        match self {
            ColumnReader::Scalar(r) => r.finish(),
            ColumnReader::Array(r) => r.finish(),
            ColumnReader::Dictionary(r) => r.finish(),
        }
    }
}
