use crate::codec::block::{Block, BlockReader};
use crate::codec::column::TypeRegistry;
use crate::codec::compression::FrameDecoder;
use crate::codec::cursor::ByteCursor;
use crate::codec::errors::CodecError;

/// Block reader fed through LZ4 frames.
///
/// A frame is pulled from the raw stream only while the block still needs
/// bytes, so whatever follows the last frame of a block is left untouched.
#[derive(Debug)]
pub struct CompressedBlockReader {
    blocks: BlockReader,
    frames: FrameDecoder,
}

impl CompressedBlockReader {
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            blocks: BlockReader::new(registry),
            frames: FrameDecoder::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.blocks.is_idle() && self.frames.is_empty()
    }

    pub fn read<C: ByteCursor>(&mut self, raw: &mut C) -> Result<Option<Block>, CodecError> {
        loop {
            if let Some(block) = self.blocks.read(self.frames.buffer())? {
                if !self.frames.is_empty() {
                    let left = self.frames.buffer().len();
                    return Err(CodecError::ProtocolStateError(format!(
                        "{left} decompressed bytes follow the block"
                    )));
                }
                return Ok(Some(block));
            }
            if !self.frames.next_frame(raw)? {
                return Ok(None);
            }
        }
    }
}
