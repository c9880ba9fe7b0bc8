use std::sync::Arc;

use crate::codec::column::descriptor::{ColumnDescriptor, TypeKind};
use crate::codec::column::type_spec::parse_descriptor;
use crate::codec::errors::CodecError;
use crate::codec::reader::{ArrayReader, ColumnReader, DictionaryReader, ScalarReader};
use crate::codec::settings::{CodecSettings, SettingsError};
use crate::codec::writer::ColumnWriter;

/// How a column is laid out on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Array,
    Dictionary,
}

impl Shape {
    pub fn of(descriptor: &ColumnDescriptor) -> Self {
        if descriptor.is_array() {
            Shape::Array
        } else if descriptor.is_low_cardinality() {
            Shape::Dictionary
        } else {
            Shape::Scalar
        }
    }
}

/// Per-session type table. Cloning shares the settings and key columns.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    settings: Arc<CodecSettings>,
    key_columns: Arc<[Arc<ColumnDescriptor>; 4]>,
}

impl TypeRegistry {
    pub fn new(settings: CodecSettings) -> Self {
        let key = |spec: &str, kind: TypeKind| {
            Arc::new(ColumnDescriptor::scalar("keys", spec, spec, kind, false, false))
        };
        Self {
            settings: Arc::new(settings),
            key_columns: Arc::new([
                key("UInt8", TypeKind::UInt8),
                key("UInt16", TypeKind::UInt16),
                key("UInt32", TypeKind::UInt32),
                key("UInt64", TypeKind::UInt64),
            ]),
        }
    }

    pub fn from_config() -> Result<Self, SettingsError> {
        Ok(Self::new(CodecSettings::from_config()?))
    }

    pub fn settings(&self) -> &Arc<CodecSettings> {
        &self.settings
    }

    /// Unsigned column holding dictionary keys of the given width code.
    pub fn key_column(&self, code: u64) -> Option<&Arc<ColumnDescriptor>> {
        self.key_columns.get(usize::try_from(code).ok()?)
    }

    pub fn descriptor(&self, name: &str, spec: &str) -> Result<ColumnDescriptor, CodecError> {
        parse_descriptor(name, spec)
    }

    pub fn column_kind(&self, name: &str, spec: &str) -> Result<ColumnKind, CodecError> {
        let descriptor = Arc::new(self.descriptor(name, spec)?);
        Ok(self.kind_of(descriptor))
    }

    pub fn kind_of(&self, descriptor: Arc<ColumnDescriptor>) -> ColumnKind {
        ColumnKind {
            shape: Shape::of(&descriptor),
            descriptor,
            registry: self.clone(),
        }
    }

    pub fn reader(&self, descriptor: Arc<ColumnDescriptor>, rows: usize) -> ColumnReader {
        self.kind_of(descriptor).reader(rows)
    }

    pub fn writer(&self, descriptor: Arc<ColumnDescriptor>, column_index: usize) -> ColumnWriter {
        self.kind_of(descriptor).writer(column_index)
    }

    /// Reader for the flattened elements of an array whose dictionary prefix is already consumed.
    pub(crate) fn leaf_reader(&self, leaf: Arc<ColumnDescriptor>, items: usize) -> ColumnReader {
        if leaf.is_low_cardinality() {
            ColumnReader::Dictionary(DictionaryReader::new(leaf, self.clone(), items, true))
        } else {
            ColumnReader::Scalar(ScalarReader::new(leaf, self.settings.clone(), items))
        }
    }
}

/// Descriptor bound to a registry, manufacturing readers and writers.
#[derive(Clone, Debug)]
pub struct ColumnKind {
    descriptor: Arc<ColumnDescriptor>,
    shape: Shape,
    registry: TypeRegistry,
}

impl ColumnKind {
    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        &self.descriptor
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn reader(&self, rows: usize) -> ColumnReader {
        let descriptor = self.descriptor.clone();
        match self.shape {
            Shape::Scalar => ColumnReader::Scalar(ScalarReader::new(
                descriptor,
                self.registry.settings.clone(),
                rows,
            )),
            Shape::Array => {
                ColumnReader::Array(ArrayReader::new(descriptor, self.registry.clone(), rows))
            }
            Shape::Dictionary => ColumnReader::Dictionary(DictionaryReader::new(
                descriptor,
                self.registry.clone(),
                rows,
                false,
            )),
        }
    }

    pub fn writer(&self, column_index: usize) -> ColumnWriter {
        ColumnWriter::new(
            self.descriptor.clone(),
            self.registry.settings.clone(),
            column_index,
        )
    }
}
