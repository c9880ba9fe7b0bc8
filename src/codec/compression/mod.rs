mod compressed_reader;
mod lz4_frame;


pub use compressed_reader::CompressedBlockReader;
pub use lz4_frame::{
    CHECKSUM_LEN, FRAME_HEADER_LEN, FrameDecoder, LZ4_METHOD, MAX_FRAME_PAYLOAD, checksum,
    write_lz4_frames,
};
