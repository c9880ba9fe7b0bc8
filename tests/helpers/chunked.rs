use bytes::BytesMut;

use crate::codec::block::{Block, BlockReader};
use crate::codec::column::{Column, TypeRegistry};
use crate::codec::compression::CompressedBlockReader;
use crate::codec::reader::ColumnReader;

/// Feeds `bytes` to a fresh block reader `chunk` bytes at a time.
pub fn decode_chunked(registry: &TypeRegistry, bytes: &[u8], chunk: usize) -> Block {
    let mut reader = BlockReader::new(registry.clone());
    let mut buffer = BytesMut::new();
    for piece in bytes.chunks(chunk) {
        buffer.extend_from_slice(piece);
        if let Some(block) = reader.read(&mut buffer).expect("block decodes") {
            assert!(buffer.is_empty(), "block left {} bytes", buffer.len());
            return block;
        }
    }
    let block = reader.read(&mut buffer).expect("block decodes");
    block.expect("input holds a whole block")
}

/// Same as `decode_chunked` for a block wrapped in LZ4 frames.
pub fn decode_compressed_chunked(registry: &TypeRegistry, bytes: &[u8], chunk: usize) -> Block {
    let mut reader = CompressedBlockReader::new(registry.clone());
    let mut buffer = BytesMut::new();
    for piece in bytes.chunks(chunk) {
        buffer.extend_from_slice(piece);
        if let Some(block) = reader.read(&mut buffer).expect("compressed block decodes") {
            assert!(buffer.is_empty(), "block left {} bytes", buffer.len());
            assert!(reader.is_idle());
            return block;
        }
    }
    let block = reader.read(&mut buffer).expect("compressed block decodes");
    block.expect("input holds a whole compressed block")
}

/// Drives a column reader one byte at a time, checking it never completes early.
pub fn read_column_bytewise(mut reader: ColumnReader, bytes: &[u8]) -> Column {
    let mut buffer = BytesMut::new();
    let mut done = reader.read(&mut buffer).expect("column decodes");
    for (i, byte) in bytes.iter().enumerate() {
        assert!(!done, "reader completed with {} bytes unread", bytes.len() - i);
        buffer.extend_from_slice(&[*byte]);
        done = reader.read(&mut buffer).expect("column decodes");
    }
    assert!(done, "reader incomplete after all bytes");
    assert!(buffer.is_empty());
    reader.finish().expect("complete column")
}
