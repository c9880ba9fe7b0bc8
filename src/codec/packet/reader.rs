use std::mem;

use tracing::{debug, warn};

use crate::codec::block::{Block, BlockReader};
use crate::codec::column::TypeRegistry;
use crate::codec::compression::CompressedBlockReader;
use crate::codec::cursor::{ByteCursor, read_whole};
use crate::codec::errors::CodecError;
use crate::codec::packet::exception::read_exception;
use crate::codec::packet::{ProfileInfo, Progress, ServerPacketType};
use crate::codec::settings::{Compression, REVISION_WITH_TEMPORARY_TABLES};

/// Decoded server packet.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerPacket {
    Data { table_name: String, block: Block },
    Totals { table_name: String, block: Block },
    Extremes { table_name: String, block: Block },
    Log { block: Block },
    /// External table name and column description, then the table's block.
    TableColumns { message: Vec<String>, block: Block },
    Progress(Progress),
    ProfileInfo(ProfileInfo),
    EndOfStream,
}

#[derive(Debug)]
enum PacketState {
    Idle,
    Message(ServerPacketType),
    TableName {
        packet_type: ServerPacketType,
        message: Vec<String>,
    },
    Block {
        packet_type: ServerPacketType,
        table_name: String,
        message: Vec<String>,
    },
    Body(ServerPacketType),
}

/// Resumable decoder for the query-response packet stream.
#[derive(Debug)]
pub struct PacketReader {
    registry: TypeRegistry,
    blocks: BlockReader,
    compressed: CompressedBlockReader,
    state: PacketState,
    end_of_stream: bool,
}

impl PacketReader {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            blocks: BlockReader::new(registry.clone()),
            compressed: CompressedBlockReader::new(registry.clone()),
            registry,
            state: PacketState::Idle,
            end_of_stream: false,
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Whether no part of a packet has been consumed yet.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, PacketState::Idle)
    }

    /// Next packet once fully buffered. A server exception frame comes back as
    /// `CodecError::ServerReported` and leaves the reader ready for the next packet.
    pub fn read<C: ByteCursor>(&mut self, cursor: &mut C) -> Result<Option<ServerPacket>, CodecError> {
        loop {
            match mem::replace(&mut self.state, PacketState::Idle) {
                PacketState::Idle => {
                    let Some(code) = cursor.read_varint()? else {
                        return Ok(None);
                    };
                    let packet_type = ServerPacketType::from_code(code).ok_or_else(|| {
                        CodecError::ProtocolStateError(format!("unknown server packet {code}"))
                    })?;
                    debug!(packet = %packet_type, "server packet");
                    self.state = if packet_type == ServerPacketType::TableColumns {
                        PacketState::Message(packet_type)
                    } else if packet_type.carries_block() {
                        self.table_name_state(packet_type, Vec::new())
                    } else {
                        PacketState::Body(packet_type)
                    };
                }
                PacketState::Message(packet_type) => {
                    let strings = read_whole(cursor, |view| {
                        Ok(view
                            .read_pascal_string()?
                            .zip(view.read_pascal_string()?))
                    })?;
                    match strings {
                        Some((table, columns)) => {
                            self.state = self.table_name_state(packet_type, vec![table, columns]);
                        }
                        None => {
                            self.state = PacketState::Message(packet_type);
                            return Ok(None);
                        }
                    }
                }
                PacketState::TableName {
                    packet_type,
                    message,
                } => match cursor.read_pascal_string()? {
                    Some(table_name) => {
                        self.state = PacketState::Block {
                            packet_type,
                            table_name,
                            message,
                        }
                    }
                    None => {
                        self.state = PacketState::TableName {
                            packet_type,
                            message,
                        };
                        return Ok(None);
                    }
                },
                PacketState::Block {
                    packet_type,
                    table_name,
                    message,
                } => match self.read_block(packet_type, cursor)? {
                    Some(block) => {
                        return Ok(Some(block_packet(packet_type, table_name, message, block)));
                    }
                    None => {
                        self.state = PacketState::Block {
                            packet_type,
                            table_name,
                            message,
                        };
                        return Ok(None);
                    }
                },
                PacketState::Body(packet_type) => {
                    let packet = match packet_type {
                        ServerPacketType::Exception => match read_exception(cursor)? {
                            Some(exception) => {
                                warn!(code = exception.code, name = %exception.name, "server exception");
                                return Err(CodecError::ServerReported(exception));
                            }
                            None => None,
                        },
                        ServerPacketType::Progress => {
                            let revision = self.registry.settings().protocol_revision;
                            Progress::read(cursor, revision)?.map(ServerPacket::Progress)
                        }
                        ServerPacketType::ProfileInfo => {
                            ProfileInfo::read(cursor)?.map(ServerPacket::ProfileInfo)
                        }
                        ServerPacketType::EndOfStream => {
                            self.end_of_stream = true;
                            Some(ServerPacket::EndOfStream)
                        }
                        other => {
                            return Err(CodecError::ProtocolStateError(format!(
                                "unexpected server packet {other} in a query response"
                            )));
                        }
                    };
                    if packet.is_none() {
                        self.state = PacketState::Body(packet_type);
                    }
                    return Ok(packet);
                }
            }
        }
    }

    fn table_name_state(&self, packet_type: ServerPacketType, message: Vec<String>) -> PacketState {
        if self.registry.settings().protocol_revision >= REVISION_WITH_TEMPORARY_TABLES {
            PacketState::TableName {
                packet_type,
                message,
            }
        } else {
            PacketState::Block {
                packet_type,
                table_name: String::new(),
                message,
            }
        }
    }

    fn read_block<C: ByteCursor>(
        &mut self,
        packet_type: ServerPacketType,
        cursor: &mut C,
    ) -> Result<Option<Block>, CodecError> {
        if packet_type.is_compressible() && self.registry.settings().compression == Compression::Lz4 {
            self.compressed.read(cursor)
        } else {
            self.blocks.read(cursor)
        }
    }
}

fn block_packet(
    packet_type: ServerPacketType,
    table_name: String,
    message: Vec<String>,
    block: Block,
) -> ServerPacket {
    match packet_type {
        ServerPacketType::Totals => ServerPacket::Totals { table_name, block },
        ServerPacketType::Extremes => ServerPacket::Extremes { table_name, block },
        ServerPacketType::Log => ServerPacket::Log { block },
        ServerPacketType::TableColumns => ServerPacket::TableColumns { message, block },
        _ => ServerPacket::Data { table_name, block },
    }
}
