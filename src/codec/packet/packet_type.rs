use std::fmt;

/// Server-to-client packet codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerPacketType {
    Hello,
    Data,
    Exception,
    Progress,
    Pong,
    EndOfStream,
    ProfileInfo,
    Totals,
    Extremes,
    TablesStatusResponse,
    Log,
    TableColumns,
}

impl ServerPacketType {
    pub fn from_code(code: u64) -> Option<Self> {
        let packet = match code {
            0 => ServerPacketType::Hello,
            1 => ServerPacketType::Data,
            2 => ServerPacketType::Exception,
            3 => ServerPacketType::Progress,
            4 => ServerPacketType::Pong,
            5 => ServerPacketType::EndOfStream,
            6 => ServerPacketType::ProfileInfo,
            7 => ServerPacketType::Totals,
            8 => ServerPacketType::Extremes,
            9 => ServerPacketType::TablesStatusResponse,
            10 => ServerPacketType::Log,
            11 => ServerPacketType::TableColumns,
            _ => return None,
        };
        Some(packet)
    }

    pub fn code(&self) -> u64 {
        match self {
            ServerPacketType::Hello => 0,
            ServerPacketType::Data => 1,
            ServerPacketType::Exception => 2,
            ServerPacketType::Progress => 3,
            ServerPacketType::Pong => 4,
            ServerPacketType::EndOfStream => 5,
            ServerPacketType::ProfileInfo => 6,
            ServerPacketType::Totals => 7,
            ServerPacketType::Extremes => 8,
            ServerPacketType::TablesStatusResponse => 9,
            ServerPacketType::Log => 10,
            ServerPacketType::TableColumns => 11,
        }
    }

    /// Packets whose body ends with a temporary-table name and a native block.
    pub fn carries_block(&self) -> bool {
        matches!(
            self,
            ServerPacketType::Data
                | ServerPacketType::Totals
                | ServerPacketType::Extremes
                | ServerPacketType::Log
                | ServerPacketType::TableColumns
        )
    }

    /// Block packets sent through the compressed stream when compression is on.
    pub fn is_compressible(&self) -> bool {
        self.carries_block() && *self != ServerPacketType::Log
    }
}

impl fmt::Display for ServerPacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}
