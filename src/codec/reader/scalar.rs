use std::mem;
use std::sync::Arc;

use tracing::trace;

use crate::codec::column::{Column, ColumnData, ColumnDescriptor, ColumnValues, NullsMap};
use crate::codec::cursor::ByteCursor;
use crate::codec::errors::CodecError;
use crate::codec::reader::state::ScalarState;
use crate::codec::settings::CodecSettings;

/// Reads one plain column: optional nulls map, then `rows` values.
#[derive(Debug)]
pub struct ScalarReader {
    descriptor: Arc<ColumnDescriptor>,
    settings: Arc<CodecSettings>,
    rows: usize,
    nulls: Option<NullsMap>,
    state: ScalarState,
}

impl ScalarReader {
    pub fn new(descriptor: Arc<ColumnDescriptor>, settings: Arc<CodecSettings>, rows: usize) -> Self {
        Self {
            descriptor,
            settings,
            rows,
            nulls: None,
            state: ScalarState::NotStarted,
        }
    }

    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> &ScalarState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, ScalarState::Done(_))
    }

    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<bool, CodecError> {
        loop {
            match &mut self.state {
                ScalarState::NotStarted => {
                    self.state = if self.rows == 0 {
                        ScalarState::Done(ColumnValues::empty(self.descriptor.physical()))
                    } else if self.descriptor.has_nulls_map() {
                        ScalarState::ReadingNullsMap
                    } else {
                        reading_items()
                    };
                }
                ScalarState::ReadingNullsMap => match NullsMap::read(cursor, self.rows) {
                    Some(nulls) => {
                        self.nulls = Some(nulls);
                        self.state = reading_items();
                    }
                    None => return Ok(false),
                },
                ScalarState::ReadingItems {
                    strings,
                    pending_len,
                } => {
                    let physical = self.descriptor.physical();
                    if physical.width().is_some() {
                        match ColumnValues::read_fixed(cursor, physical, self.rows) {
                            Some(values) => self.state = ScalarState::Done(values),
                            None => return Ok(false),
                        }
                        continue;
                    }
                    while strings.len() < self.rows {
                        let len = match *pending_len {
                            Some(len) => len,
                            None => match cursor.read_varint()? {
                                Some(len) => {
                                    let len = string_len(len)?;
                                    *pending_len = Some(len);
                                    len
                                }
                                None => return Ok(false),
                            },
                        };
                        match cursor.read_bytes(len) {
                            Some(item) => {
                                strings.push(item);
                                *pending_len = None;
                            }
                            None => {
                                trace!(
                                    column = %self.descriptor.name(),
                                    done = strings.len(),
                                    pending = len,
                                    "string column waiting for bytes"
                                );
                                return Ok(false);
                            }
                        }
                    }
                    let items = mem::take(strings);
                    self.state = ScalarState::Done(ColumnValues::Bytes(items));
                }
                ScalarState::Done(_) => return Ok(true),
            }
        }
    }

    pub fn finish(self) -> Result<Column, CodecError> {
        match self.state {
            ScalarState::Done(values) => Ok(Column::new(
                self.descriptor,
                self.settings,
                ColumnData::Scalar {
                    values,
                    nulls: self.nulls,
                },
            )),
            _ => Err(incomplete(&self.descriptor)),
        }
    }
}

fn reading_items() -> ScalarState {
    ScalarState::ReadingItems {
        strings: Vec::new(),
        pending_len: None,
    }
}

fn string_len(len: u64) -> Result<usize, CodecError> {
    if len > i32::MAX as u64 {
        return Err(CodecError::ProtocolLimitExceeded(format!(
            "string length {len} exceeds {}",
            i32::MAX
        )));
    }
    Ok(len as usize)
}

pub(crate) fn incomplete(descriptor: &ColumnDescriptor) -> CodecError {
    CodecError::ProtocolStateError(format!(
        "column '{}' finished before all data was read",
        descriptor.name()
    ))
}
