use bytes::BytesMut;

use crate::codec::block::BlockWriter;
use crate::codec::column::TypeRegistry;
use crate::codec::types::Value;
use crate::test_helpers::factories::{DescriptorFactory, RegistryFactory};

/// Encodes rows into native block bytes through `BlockWriter`.
pub struct BlockBytesFactory {
    registry: TypeRegistry,
    columns: Vec<(String, String)>,
    rows: Vec<Vec<Value>>,
}

impl BlockBytesFactory {
    pub fn new() -> Self {
        Self {
            registry: RegistryFactory::new().create(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_column(mut self, name: &str, spec: &str) -> Self {
        self.columns.push((name.to_string(), spec.to_string()));
        self
    }

    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    /// Single-column shortcut: one row per value.
    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.rows.extend(values.into_iter().map(|v| vec![v]));
        self
    }

    pub fn create(self) -> BytesMut {
        let descriptors = self
            .columns
            .iter()
            .map(|(name, spec)| DescriptorFactory::new().with_name(name).with_type(spec).create())
            .collect();
        let writer = BlockWriter::new(&self.registry, descriptors, self.rows).expect("rows match columns");
        let mut out = BytesMut::new();
        writer.serialize_all(&mut out).expect("rows encode");
        out
    }
}
