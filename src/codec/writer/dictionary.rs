use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use indexmap::IndexMap;
use tracing::trace;

use crate::codec::column::format::{
    HAS_ADDITIONAL_KEYS_BIT, LOW_CARDINALITY_KEYS_VERSION, NEED_UPDATE_DICTIONARY_BIT,
    key_code_for,
};
use crate::codec::column::{ColumnDescriptor, PhysicalType};
use crate::codec::errors::CodecError;
use crate::codec::settings::CodecSettings;
use crate::codec::types::Value;
use crate::codec::writer::ScalarWriter;

/// Encodes a `LowCardinality` column as a dictionary plus per-row keys.
#[derive(Clone, Debug)]
pub struct DictionaryWriter {
    descriptor: Arc<ColumnDescriptor>,
    index: ScalarWriter,
}

/// Dictionary built from one scan over the rows.
#[derive(Debug, Default)]
pub struct Dictionary {
    /// Encoded entry -> slot. Byte-identical encodings share a slot.
    entries: IndexMap<Vec<u8>, u64>,
    keys: Vec<u64>,
    nullable: bool,
}

impl Dictionary {
    /// Entries on the wire, including the null slot.
    pub fn size(&self) -> usize {
        self.entries.len() + usize::from(self.nullable)
    }

    pub fn keys(&self) -> &[u64] {
        &self.keys
    }

    pub fn key_code(&self) -> u64 {
        key_code_for(self.size())
    }
}

impl DictionaryWriter {
    pub fn new(descriptor: Arc<ColumnDescriptor>, settings: Arc<CodecSettings>) -> Self {
        let index = ScalarWriter::new(Arc::new(descriptor.index_descriptor()), settings);
        Self { descriptor, index }
    }

    pub fn serialize_state_prefix<B: BufMut + ?Sized>(&self, sink: &mut B) {
        sink.put_u64_le(LOW_CARDINALITY_KEYS_VERSION);
    }

    pub fn build_dictionary(&self, values: &[&Value]) -> Result<Dictionary, CodecError> {
        let nullable = self.descriptor.is_nullable();
        let first_slot = u64::from(nullable);
        let mut dictionary = Dictionary {
            nullable,
            ..Dictionary::default()
        };
        let mut scratch = BytesMut::new();
        for value in values {
            if value.is_null() {
                if !nullable {
                    return Err(CodecError::ValueOutOfRange(format!(
                        "null in non-nullable column '{}'",
                        self.descriptor.name()
                    )));
                }
                dictionary.keys.push(0);
                continue;
            }
            scratch.clear();
            self.index.encode(&mut scratch, value)?;
            let next = first_slot + dictionary.entries.len() as u64;
            let key = *dictionary.entries.entry(scratch.to_vec()).or_insert(next);
            dictionary.keys.push(key);
        }
        Ok(dictionary)
    }

    pub fn serialize_data<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        values: &[&Value],
    ) -> Result<(), CodecError> {
        if values.is_empty() {
            return Ok(());
        }
        let dictionary = self.build_dictionary(values)?;
        let key_code = dictionary.key_code();
        trace!(
            column = %self.descriptor.name(),
            entries = dictionary.size(),
            key_code,
            "dictionary built"
        );

        sink.put_u64_le(HAS_ADDITIONAL_KEYS_BIT | NEED_UPDATE_DICTIONARY_BIT | key_code);
        sink.put_u64_le(dictionary.size() as u64);
        if dictionary.nullable {
            self.index.encode_null(sink);
        }
        for encoded in dictionary.entries.keys() {
            sink.put_slice(encoded);
        }
        sink.put_u64_le(values.len() as u64);
        let width = PhysicalType::for_key_code(key_code)
            .and_then(|p| p.width())
            .unwrap_or(8);
        for key in &dictionary.keys {
            sink.put_uint_le(*key, width);
        }
        Ok(())
    }
}
