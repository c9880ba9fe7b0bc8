use std::mem;

use tracing::{debug, trace};

use crate::codec::block::{Block, BlockInfo};
use crate::codec::column::{Column, TypeRegistry};
use crate::codec::cursor::{ByteCursor, read_whole};
use crate::codec::errors::CodecError;
use crate::codec::reader::ColumnReader;

/// Where a block decode stands between deliveries.
#[derive(Debug)]
pub enum BlockState {
    Info,
    Counts {
        info: BlockInfo,
    },
    ColumnHeader {
        info: BlockInfo,
        columns: usize,
        rows: usize,
        decoded: Vec<Column>,
    },
    ColumnData {
        info: BlockInfo,
        columns: usize,
        rows: usize,
        decoded: Vec<Column>,
        reader: Box<ColumnReader>,
    },
}

/// Resumable decoder for a sequence of native blocks.
#[derive(Debug)]
pub struct BlockReader {
    registry: TypeRegistry,
    state: BlockState,
}

impl BlockReader {
    pub fn new(registry: TypeRegistry) -> Self {
        let state = Self::initial_state(&registry);
        Self { registry, state }
    }

    fn initial_state(registry: &TypeRegistry) -> BlockState {
        if registry.settings().has_block_info() {
            BlockState::Info
        } else {
            BlockState::Counts {
                info: BlockInfo::default(),
            }
        }
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    /// Whether no part of a block has been consumed yet.
    pub fn is_idle(&self) -> bool {
        match self.state {
            BlockState::Info => true,
            BlockState::Counts { .. } => !self.registry.settings().has_block_info(),
            _ => false,
        }
    }

    /// Feeds buffered bytes; returns the block once its last column completes.
    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<Option<Block>, CodecError> {
        loop {
            let state = mem::replace(&mut self.state, BlockState::Info);
            match self.step(state, cursor)? {
                Progress::Advanced(next) => self.state = next,
                Progress::NeedMore(current) => {
                    self.state = current;
                    return Ok(None);
                }
                Progress::Finished(block) => {
                    self.state = Self::initial_state(&self.registry);
                    debug!(
                        rows = block.rows(),
                        columns = block.column_count(),
                        "block decoded"
                    );
                    return Ok(Some(block));
                }
            }
        }
    }

    fn step<C: ByteCursor>(
        &self,
        state: BlockState,
        cursor: &mut C,
    ) -> Result<Progress, CodecError> {
        let next = match state {
            BlockState::Info => match BlockInfo::read(cursor)? {
                Some(info) => BlockState::Counts { info },
                None => return Ok(Progress::NeedMore(BlockState::Info)),
            },
            BlockState::Counts { info } => {
                let counts = read_whole(cursor, |view| {
                    Ok(view.read_varint()?.zip(view.read_varint()?))
                })?;
                let Some((columns, rows)) = counts else {
                    return Ok(Progress::NeedMore(BlockState::Counts { info }));
                };
                let columns = count("column", columns)?;
                let rows = count("row", rows)?;
                trace!(columns, rows, "block header");
                BlockState::ColumnHeader {
                    info,
                    columns,
                    rows,
                    decoded: Vec::new(),
                }
            }
            BlockState::ColumnHeader {
                info,
                columns,
                rows,
                decoded,
            } => {
                if decoded.len() == columns {
                    return Ok(Progress::Finished(Block::new(info, rows, decoded)));
                }
                let header = read_whole(cursor, |view| {
                    Ok(view
                        .read_pascal_string()?
                        .zip(view.read_pascal_string()?))
                })?;
                let Some((name, spec)) = header else {
                    return Ok(Progress::NeedMore(BlockState::ColumnHeader {
                        info,
                        columns,
                        rows,
                        decoded,
                    }));
                };
                let kind = self.registry.column_kind(&name, &spec)?;
                BlockState::ColumnData {
                    info,
                    columns,
                    rows,
                    decoded,
                    reader: Box::new(kind.reader(rows)),
                }
            }
            BlockState::ColumnData {
                info,
                columns,
                rows,
                mut decoded,
                mut reader,
            } => {
                if !reader.read(cursor)? {
                    return Ok(Progress::NeedMore(BlockState::ColumnData {
                        info,
                        columns,
                        rows,
                        decoded,
                        reader,
                    }));
                }
                decoded.push(reader.finish()?);
                BlockState::ColumnHeader {
                    info,
                    columns,
                    rows,
                    decoded,
                }
            }
        };
        Ok(Progress::Advanced(next))
    }
}

enum Progress {
    Advanced(BlockState),
    NeedMore(BlockState),
    Finished(Block),
}

fn count(what: &str, value: u64) -> Result<usize, CodecError> {
    if value > i32::MAX as u64 {
        return Err(CodecError::ProtocolLimitExceeded(format!(
            "{what} count {value} exceeds {}",
            i32::MAX
        )));
    }
    Ok(value as usize)
}

/// Convenience for callers holding a complete buffer.
pub fn decode_block<C: ByteCursor>(
    registry: &TypeRegistry,
    cursor: &mut C,
) -> Result<Option<Block>, CodecError> {
    BlockReader::new(registry.clone()).read(cursor)
}
