use std::sync::Arc;

use crate::codec::column::descriptor::ColumnDescriptor;
use crate::codec::column::nulls_map::NullsMap;
use crate::codec::column::representation::{self, Representation};
use crate::codec::column::values::ColumnValues;
use crate::codec::errors::CodecError;
use crate::codec::settings::CodecSettings;
use crate::codec::types::Value;

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Scalar {
        values: ColumnValues,
        nulls: Option<NullsMap>,
    },
    /// One cumulative offset layer per dimension over a flattened leaf column.
    Array {
        offsets: Vec<Vec<u64>>,
        leaf: Box<Column>,
    },
    Dictionary {
        dictionary: Box<Column>,
        keys: ColumnValues,
    },
}

/// Fully decoded column. Immutable once a reader hands it over.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    descriptor: Arc<ColumnDescriptor>,
    settings: Arc<CodecSettings>,
    data: ColumnData,
}

impl Column {
    pub(crate) fn new(
        descriptor: Arc<ColumnDescriptor>,
        settings: Arc<CodecSettings>,
        data: ColumnData,
    ) -> Self {
        Self {
            descriptor,
            settings,
            data,
        }
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn into_data(self) -> ColumnData {
        self.data
    }

    pub fn rows(&self) -> usize {
        match &self.data {
            ColumnData::Scalar { values, .. } => values.len(),
            ColumnData::Array { offsets, .. } => offsets.first().map_or(0, Vec::len),
            ColumnData::Dictionary { keys, .. } => keys.len(),
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Scalar { nulls, .. } => nulls.as_ref().is_some_and(|n| n.is_null(row)),
            ColumnData::Array { .. } => false,
            ColumnData::Dictionary { keys, .. } => {
                self.descriptor.is_nullable() && keys.key_at(row) == Some(0)
            }
        }
    }

    /// Decodes one row, slicing array rows through their per-dimension boundaries.
    pub fn element(&self, row: usize, repr: Representation) -> Result<Value, CodecError> {
        if row >= self.rows() {
            return Err(CodecError::ValueOutOfRange(format!(
                "row {row} outside column '{}' of {} rows",
                self.descriptor.name(),
                self.rows()
            )));
        }
        match &self.data {
            ColumnData::Scalar { values, nulls } => {
                if nulls.as_ref().is_some_and(|n| n.is_null(row)) {
                    return Ok(Value::Null);
                }
                representation::convert(&self.descriptor, values, row, repr, &self.settings)
            }
            ColumnData::Dictionary { dictionary, keys } => {
                let key = keys.key_at(row).unwrap_or(0) as usize;
                if self.descriptor.is_nullable() && key == 0 {
                    return Ok(Value::Null);
                }
                dictionary.element(key, repr)
            }
            ColumnData::Array { offsets, leaf } => {
                let (start, end) = bounds(&offsets[0], row);
                slice(offsets, leaf, 0, start, end, repr)
            }
        }
    }

    /// Decodes every row. Arrays are rebuilt bottom-up from the flattened leaf.
    pub fn values(&self, repr: Representation) -> Result<Vec<Value>, CodecError> {
        match &self.data {
            ColumnData::Array { offsets, leaf } => {
                let mut level = leaf.values(repr)?;
                for layer in offsets.iter().rev() {
                    let mut items = level.into_iter();
                    let mut prev = 0u64;
                    let mut rebuilt = Vec::with_capacity(layer.len());
                    for &offset in layer {
                        let len = offset.saturating_sub(prev) as usize;
                        rebuilt.push(Value::Array(items.by_ref().take(len).collect()));
                        prev = offset;
                    }
                    level = rebuilt;
                }
                Ok(level)
            }
            _ => (0..self.rows()).map(|row| self.element(row, repr)).collect(),
        }
    }
}

fn bounds(layer: &[u64], index: usize) -> (usize, usize) {
    let start = if index == 0 { 0 } else { layer[index - 1] };
    (start as usize, layer[index] as usize)
}

fn slice(
    offsets: &[Vec<u64>],
    leaf: &Column,
    depth: usize,
    start: usize,
    end: usize,
    repr: Representation,
) -> Result<Value, CodecError> {
    let items = if depth + 1 == offsets.len() {
        (start..end)
            .map(|i| leaf.element(i, repr))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        (start..end)
            .map(|i| {
                let (s, e) = bounds(&offsets[depth + 1], i);
                slice(offsets, leaf, depth + 1, s, e, repr)
            })
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(Value::Array(items))
}
