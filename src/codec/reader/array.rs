use std::mem;
use std::sync::Arc;

use tracing::trace;

use crate::codec::column::{Column, ColumnData, ColumnDescriptor, TypeRegistry};
use crate::codec::cursor::ByteCursor;
use crate::codec::errors::CodecError;
use crate::codec::reader::dictionary::read_version;
use crate::codec::reader::scalar::incomplete;
use crate::codec::reader::state::{ArrayState, Step};

/// Reads a D-dimensional array column: D offset layers, then the flattened leaf.
#[derive(Debug)]
pub struct ArrayReader {
    descriptor: Arc<ColumnDescriptor>,
    leaf: Arc<ColumnDescriptor>,
    registry: TypeRegistry,
    rows: usize,
    state: ArrayState,
}

impl ArrayReader {
    pub fn new(descriptor: Arc<ColumnDescriptor>, registry: TypeRegistry, rows: usize) -> Self {
        let leaf = descriptor
            .nested()
            .cloned()
            .unwrap_or_else(|| Arc::new(descriptor.index_descriptor()));
        Self {
            descriptor,
            leaf,
            registry,
            rows,
            state: ArrayState::NotStarted,
        }
    }

    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> &ArrayState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, ArrayState::Done(_))
    }

    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<bool, CodecError> {
        loop {
            if let ArrayState::Done(_) = self.state {
                return Ok(true);
            }
            let state = mem::replace(&mut self.state, ArrayState::NotStarted);
            match self.step(state, cursor)? {
                Step::Advanced(next) => self.state = next,
                Step::NeedMore(current) => {
                    self.state = current;
                    return Ok(false);
                }
            }
        }
    }

    fn step<C: ByteCursor>(
        &self,
        state: ArrayState,
        cursor: &mut C,
    ) -> Result<Step<ArrayState>, CodecError> {
        let next = match state {
            ArrayState::NotStarted => {
                if self.rows > 0 && self.leaf.is_low_cardinality() {
                    ArrayState::LeafPrefix
                } else {
                    offsets_start()
                }
            }
            ArrayState::LeafPrefix => {
                if !read_version(cursor)? {
                    return Ok(Step::NeedMore(ArrayState::LeafPrefix));
                }
                offsets_start()
            }
            ArrayState::Offsets {
                mut layers,
                mut current,
            } => {
                while layers.len() < self.descriptor.array_dimensions() {
                    let expected = match layers.last() {
                        None => self.rows,
                        Some(parent) => parent.last().copied().unwrap_or(0) as usize,
                    };
                    while current.len() < expected {
                        let Some(offset) = cursor.read_u64_le() else {
                            trace!(
                                column = %self.descriptor.name(),
                                layer = layers.len(),
                                done = current.len(),
                                expected,
                                "array offsets waiting for bytes"
                            );
                            return Ok(Step::NeedMore(ArrayState::Offsets { layers, current }));
                        };
                        self.check_offset(offset, current.last().copied())?;
                        current.push(offset);
                    }
                    layers.push(mem::take(&mut current));
                }
                let items = layers
                    .last()
                    .and_then(|layer| layer.last().copied())
                    .unwrap_or(0) as usize;
                let reader = self.registry.leaf_reader(self.leaf.clone(), items);
                ArrayState::Leaf {
                    offsets: layers,
                    reader: Box::new(reader),
                }
            }
            ArrayState::Leaf {
                offsets,
                mut reader,
            } => {
                if !reader.read(cursor)? {
                    return Ok(Step::NeedMore(ArrayState::Leaf { offsets, reader }));
                }
                let leaf = reader.finish()?;
                ArrayState::Done(Column::new(
                    self.descriptor.clone(),
                    self.registry.settings().clone(),
                    ColumnData::Array {
                        offsets,
                        leaf: Box::new(leaf),
                    },
                ))
            }
            done @ ArrayState::Done(_) => done,
        };
        Ok(Step::Advanced(next))
    }

    fn check_offset(&self, offset: u64, previous: Option<u64>) -> Result<(), CodecError> {
        if offset > i32::MAX as u64 {
            return Err(CodecError::ProtocolLimitExceeded(format!(
                "array offset {offset} in column '{}' exceeds {}",
                self.descriptor.name(),
                i32::MAX
            )));
        }
        if previous.is_some_and(|prev| offset < prev) {
            return Err(CodecError::ProtocolStateError(format!(
                "array offsets in column '{}' decrease",
                self.descriptor.name()
            )));
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Column, CodecError> {
        match self.state {
            ArrayState::Done(column) => Ok(column),
            _ => Err(incomplete(&self.descriptor)),
        }
    }
}

fn offsets_start() -> ArrayState {
    ArrayState::Offsets {
        layers: Vec::new(),
        current: Vec::new(),
    }
}
