use std::sync::Arc;

use bytes::BufMut;

use crate::codec::column::ColumnDescriptor;
use crate::codec::errors::CodecError;
use crate::codec::types::Value;
use crate::codec::writer::ColumnWriter;

/// Encodes a D-dimensional array column: offset layers, then the flattened leaf.
#[derive(Clone, Debug)]
pub struct ArrayWriter {
    descriptor: Arc<ColumnDescriptor>,
    leaf: Box<ColumnWriter>,
}

impl ArrayWriter {
    pub fn new(descriptor: Arc<ColumnDescriptor>, leaf: ColumnWriter) -> Self {
        Self {
            descriptor,
            leaf: Box::new(leaf),
        }
    }

    pub fn leaf(&self) -> &ColumnWriter {
        &self.leaf
    }

    pub fn serialize_state_prefix<B: BufMut + ?Sized>(&self, sink: &mut B) {
        self.leaf.serialize_state_prefix(sink);
    }

    /// Cumulative offsets per layer plus the flattened leaf values. `Null` rows count as empty.
    pub fn flatten<'a>(&self, values: &[&'a Value]) -> Result<(Vec<Vec<u64>>, Vec<&'a Value>), CodecError> {
        let mut layers = Vec::with_capacity(self.descriptor.array_dimensions());
        let mut current: Vec<&'a Value> = values.to_vec();
        for depth in 0..self.descriptor.array_dimensions() {
            let mut offsets = Vec::with_capacity(current.len());
            let mut next = Vec::new();
            for value in current {
                match value {
                    Value::Array(items) => next.extend(items.iter()),
                    Value::Null => {}
                    other => {
                        return Err(CodecError::ValueOutOfRange(format!(
                            "column '{}' expects an array at depth {depth}, got {}",
                            self.descriptor.name(),
                            other.type_name()
                        )));
                    }
                }
                if next.len() > i32::MAX as usize {
                    return Err(CodecError::ProtocolLimitExceeded(format!(
                        "column '{}' flattens to more than {} elements",
                        self.descriptor.name(),
                        i32::MAX
                    )));
                }
                offsets.push(next.len() as u64);
            }
            layers.push(offsets);
            current = next;
        }
        Ok((layers, current))
    }

    pub fn serialize_data<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        values: &[&Value],
    ) -> Result<(), CodecError> {
        let (layers, leaf_values) = self.flatten(values)?;
        for layer in &layers {
            for offset in layer {
                sink.put_u64_le(*offset);
            }
        }
        self.leaf.serialize_nulls_map(sink, &leaf_values);
        self.leaf.serialize_data(sink, &leaf_values)
    }
}
