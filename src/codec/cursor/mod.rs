mod byte_cursor;
mod sink;


pub use byte_cursor::{
    ByteCursor, MAX_VARINT_LEN, SIZE_U16, SIZE_U32, SIZE_U64, decode_varint, read_whole,
};
pub use sink::WireSink;
