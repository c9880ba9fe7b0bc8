mod block_data;
mod block_info;
mod reader;
mod writer;

#[cfg(test)]
mod block_info_test;

pub use block_data::Block;
pub use block_info::BlockInfo;
pub use reader::{BlockReader, BlockState, decode_block};
pub use writer::BlockWriter;
