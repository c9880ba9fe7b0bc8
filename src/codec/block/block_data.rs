use crate::codec::block::BlockInfo;
use crate::codec::column::{Column, ColumnDescriptor, Representation};
use crate::codec::errors::CodecError;
use crate::codec::types::Value;

/// One decoded batch: ordered columns of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    info: BlockInfo,
    rows: usize,
    columns: Vec<Column>,
}

impl Block {
    pub fn new(info: BlockInfo, rows: usize, columns: Vec<Column>) -> Self {
        Self {
            info,
            rows,
            columns,
        }
    }

    pub fn info(&self) -> &BlockInfo {
        &self.info
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.descriptor().name() == name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().map(Column::descriptor)
    }

    pub fn element(
        &self,
        row: usize,
        column: usize,
        repr: Representation,
    ) -> Result<Value, CodecError> {
        let col = self.columns.get(column).ok_or_else(|| {
            CodecError::ValueOutOfRange(format!(
                "column {column} outside block of {} columns",
                self.columns.len()
            ))
        })?;
        col.element(row, repr)
    }

    pub fn row(&self, row: usize, repr: Representation) -> Result<Vec<Value>, CodecError> {
        self.columns.iter().map(|c| c.element(row, repr)).collect()
    }

    /// Row-major copy of the whole block.
    pub fn to_rows(&self, repr: Representation) -> Result<Vec<Vec<Value>>, CodecError> {
        let mut rows: Vec<Vec<Value>> = (0..self.rows)
            .map(|_| Vec::with_capacity(self.columns.len()))
            .collect();
        for column in &self.columns {
            for (row, value) in rows.iter_mut().zip(column.values(repr)?) {
                row.push(value);
            }
        }
        Ok(rows)
    }
}
