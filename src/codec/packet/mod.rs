mod exception;
mod packet_type;
mod profile_info;
mod progress;
mod reader;


pub use exception::{read_exception, write_exception};
pub use packet_type::ServerPacketType;
pub use profile_info::ProfileInfo;
pub use progress::Progress;
pub use reader::{PacketReader, ServerPacket};
