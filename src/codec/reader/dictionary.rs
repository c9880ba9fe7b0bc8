use std::mem;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::codec::column::format::{
    HAS_ADDITIONAL_KEYS_BIT, KEY_WIDTH_MASK, LOW_CARDINALITY_KEYS_VERSION,
    NEED_GLOBAL_DICTIONARY_BIT,
};
use crate::codec::column::{Column, ColumnData, ColumnDescriptor, ColumnValues, TypeRegistry};
use crate::codec::cursor::{ByteCursor, SIZE_U64};
use crate::codec::errors::CodecError;
use crate::codec::reader::ScalarReader;
use crate::codec::reader::scalar::incomplete;
use crate::codec::reader::state::{DictionaryState, Step};

/// Reads a `LowCardinality` column: version, header, dictionary, row count, keys.
#[derive(Debug)]
pub struct DictionaryReader {
    descriptor: Arc<ColumnDescriptor>,
    registry: TypeRegistry,
    rows: usize,
    state: DictionaryState,
}

impl DictionaryReader {
    /// `prefix_consumed` is set when an enclosing array already read the version word.
    pub fn new(
        descriptor: Arc<ColumnDescriptor>,
        registry: TypeRegistry,
        rows: usize,
        prefix_consumed: bool,
    ) -> Self {
        let state = if rows == 0 {
            DictionaryState::Done(empty_column(&descriptor, &registry))
        } else if prefix_consumed {
            DictionaryState::Header
        } else {
            DictionaryState::Version
        };
        Self {
            descriptor,
            registry,
            rows,
            state,
        }
    }

    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> &DictionaryState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, DictionaryState::Done(_))
    }

    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<bool, CodecError> {
        loop {
            if let DictionaryState::Done(_) = self.state {
                return Ok(true);
            }
            let state = mem::replace(&mut self.state, DictionaryState::Version);
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
        state: DictionaryState,
        cursor: &mut C,
    ) -> Result<Step<DictionaryState>, CodecError> {
        let next = match state {
            DictionaryState::Version => {
                if !read_version(cursor)? {
                    return Ok(Step::NeedMore(DictionaryState::Version));
                }
                DictionaryState::Header
            }
            DictionaryState::Header => {
                if !cursor.has_bytes(2 * SIZE_U64) {
                    return Ok(Step::NeedMore(DictionaryState::Header));
                }
                let serialization = cursor.read_u64_le().unwrap_or_default();
                let dictionary_size = cursor.read_u64_le().unwrap_or_default();
                let key_code = self.check_header(serialization, dictionary_size)?;
                trace!(
                    column = %self.descriptor.name(),
                    key_code,
                    dictionary_size,
                    "dictionary header"
                );
                DictionaryState::Dictionary {
                    key_code,
                    reader: Box::new(ScalarReader::new(
                        Arc::new(self.descriptor.index_descriptor()),
                        self.registry.settings().clone(),
                        dictionary_size as usize,
                    )),
                }
            }
            DictionaryState::Dictionary {
                key_code,
                mut reader,
            } => {
                if !reader.read(cursor)? {
                    return Ok(Step::NeedMore(DictionaryState::Dictionary {
                        key_code,
                        reader,
                    }));
                }
                let dictionary = reader.finish()?;
                if self.descriptor.is_nullable() && dictionary.rows() == 0 {
                    return Err(CodecError::ProtocolStateError(format!(
                        "nullable dictionary for '{}' has no null slot",
                        self.descriptor.name()
                    )));
                }
                DictionaryState::RowCount {
                    key_code,
                    dictionary,
                }
            }
            DictionaryState::RowCount {
                key_code,
                dictionary,
            } => {
                let Some(count) = cursor.read_u64_le() else {
                    return Ok(Step::NeedMore(DictionaryState::RowCount {
                        key_code,
                        dictionary,
                    }));
                };
                if count != self.rows as u64 {
                    return Err(CodecError::ProtocolStateError(format!(
                        "dictionary column '{}' announces {count} rows, block has {}",
                        self.descriptor.name(),
                        self.rows
                    )));
                }
                let key_column = self.registry.key_column(key_code).ok_or_else(|| {
                    CodecError::ProtocolStateError(format!("key width code {key_code}"))
                })?;
                DictionaryState::Keys {
                    dictionary,
                    reader: Box::new(ScalarReader::new(
                        key_column.clone(),
                        self.registry.settings().clone(),
                        self.rows,
                    )),
                }
            }
            DictionaryState::Keys {
                dictionary,
                mut reader,
            } => {
                if !reader.read(cursor)? {
                    return Ok(Step::NeedMore(DictionaryState::Keys { dictionary, reader }));
                }
                let ColumnData::Scalar { values: keys, .. } = reader.finish()?.into_data() else {
                    return Err(incomplete(&self.descriptor));
                };
                check_keys(&self.descriptor, &keys, dictionary.rows())?;
                debug!(
                    column = %self.descriptor.name(),
                    rows = self.rows,
                    entries = dictionary.rows(),
                    "dictionary column decoded"
                );
                DictionaryState::Done(Column::new(
                    self.descriptor.clone(),
                    self.registry.settings().clone(),
                    ColumnData::Dictionary {
                        dictionary: Box::new(dictionary),
                        keys,
                    },
                ))
            }
            done @ DictionaryState::Done(_) => done,
        };
        Ok(Step::Advanced(next))
    }

    fn check_header(&self, serialization: u64, dictionary_size: u64) -> Result<u64, CodecError> {
        if serialization & NEED_GLOBAL_DICTIONARY_BIT != 0 {
            return Err(CodecError::ProtocolStateError(format!(
                "column '{}' requires a global dictionary",
                self.descriptor.name()
            )));
        }
        if serialization & HAS_ADDITIONAL_KEYS_BIT == 0 {
            return Err(CodecError::ProtocolStateError(format!(
                "column '{}' carries no dictionary keys",
                self.descriptor.name()
            )));
        }
        let key_code = serialization & KEY_WIDTH_MASK;
        if key_code > 3 {
            return Err(CodecError::ProtocolStateError(format!(
                "invalid key width code {key_code}"
            )));
        }
        if dictionary_size > i32::MAX as u64 {
            return Err(CodecError::ProtocolLimitExceeded(format!(
                "dictionary of {dictionary_size} entries"
            )));
        }
        Ok(key_code)
    }

    pub fn finish(self) -> Result<Column, CodecError> {
        match self.state {
            DictionaryState::Done(column) => Ok(column),
            _ => Err(incomplete(&self.descriptor)),
        }
    }
}

/// Reads the keys-serialization version word shared by standalone and array-nested columns.
pub(crate) fn read_version<C: ByteCursor>(cursor: &mut C) -> Result<bool, CodecError> {
    let Some(version) = cursor.read_u64_le() else {
        return Ok(false);
    };
    if version != LOW_CARDINALITY_KEYS_VERSION {
        return Err(CodecError::ProtocolStateError(format!(
            "unsupported dictionary keys version {version}"
        )));
    }
    Ok(true)
}

fn check_keys(
    descriptor: &ColumnDescriptor,
    keys: &ColumnValues,
    dictionary_size: usize,
) -> Result<(), CodecError> {
    for row in 0..keys.len() {
        let key = keys.key_at(row).unwrap_or(u64::MAX);
        if key >= dictionary_size as u64 {
            return Err(CodecError::ProtocolStateError(format!(
                "key {key} at row {row} of '{}' outside dictionary of {dictionary_size}",
                descriptor.name()
            )));
        }
    }
    Ok(())
}

fn empty_column(descriptor: &Arc<ColumnDescriptor>, registry: &TypeRegistry) -> Column {
    let index = descriptor.index_descriptor();
    Column::new(
        descriptor.clone(),
        registry.settings().clone(),
        ColumnData::Dictionary {
            dictionary: Box::new(Column::new(
                Arc::new(index.clone()),
                registry.settings().clone(),
                ColumnData::Scalar {
                    values: ColumnValues::empty(index.physical()),
                    nulls: None,
                },
            )),
            keys: ColumnValues::U8(Vec::new()),
        },
    )
}
