use bytes::{BufMut, BytesMut};
use cityhash_rs::cityhash_102_128;
use lz4_flex::block::{compress, decompress};
use tracing::trace;

use crate::codec::cursor::ByteCursor;
use crate::codec::errors::CodecError;

pub const CHECKSUM_LEN: usize = 16;
/// Method byte, size with header, uncompressed size.
pub const FRAME_HEADER_LEN: usize = 9;
pub const LZ4_METHOD: u8 = 0x82;
/// Upper bound on the LZ4 decompression ratio.
const MAX_EXPANSION: usize = 256;
/// Largest payload put into a single frame on write.
pub const MAX_FRAME_PAYLOAD: usize = 1 << 20;

/// CityHash128 (v1.0.2) of a frame body in wire order: high half first.
pub fn checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = cityhash_102_128(body);
    ((hash << 64) | (hash >> 64)).to_le_bytes()
}

/// Compresses `payload` into one or more frames of at most `max_payload` bytes each.
pub fn write_lz4_frames<B: BufMut + ?Sized>(sink: &mut B, payload: &[u8], max_payload: usize) {
    let step = max_payload.clamp(1, MAX_FRAME_PAYLOAD);
    for piece in payload.chunks(step) {
        let compressed = compress(piece);
        let mut body = BytesMut::with_capacity(FRAME_HEADER_LEN + compressed.len());
        body.put_u8(LZ4_METHOD);
        body.put_u32_le((FRAME_HEADER_LEN + compressed.len()) as u32);
        body.put_u32_le(piece.len() as u32);
        body.put_slice(&compressed);
        sink.put_slice(&checksum(&body));
        sink.put_slice(&body);
    }
}

/// Unwraps compressed frames into a plain byte buffer.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    decompressed: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompressed bytes not yet consumed.
    pub fn buffer(&mut self) -> &mut BytesMut {
        &mut self.decompressed
    }

    pub fn is_empty(&self) -> bool {
        self.decompressed.is_empty()
    }

    /// Decodes one frame once it is fully buffered in `raw`; otherwise consumes nothing.
    pub fn next_frame<C: ByteCursor>(&mut self, raw: &mut C) -> Result<bool, CodecError> {
        let Some((size_with_header, uncompressed)) = frame_header(raw.peek())? else {
            return Ok(false);
        };
        let total = CHECKSUM_LEN + size_with_header;
        if !raw.has_bytes(total) {
            trace!(
                needed = total,
                available = raw.available(),
                "compressed frame waiting for bytes"
            );
            return Ok(false);
        }
        let payload = {
            let (expected, body) = raw.peek()[..total].split_at(CHECKSUM_LEN);
            if checksum(body).as_slice() != expected {
                return Err(CodecError::ProtocolStateError(format!(
                    "checksum mismatch in compressed frame of {size_with_header} bytes"
                )));
            }
            decompress(&body[FRAME_HEADER_LEN..], uncompressed)
                .map_err(|e| CodecError::ProtocolStateError(format!("lz4 frame: {e}")))?
        };
        if payload.len() != uncompressed {
            return Err(CodecError::ProtocolStateError(format!(
                "lz4 frame holds {} bytes, header announces {uncompressed}",
                payload.len()
            )));
        }
        raw.skip(total);
        trace!(
            compressed = size_with_header,
            uncompressed, "compressed frame decoded"
        );
        self.decompressed.extend_from_slice(&payload);
        Ok(true)
    }
}

/// Validated `(size_with_header, uncompressed_size)`, or `None` while the header is incomplete.
fn frame_header(head: &[u8]) -> Result<Option<(usize, usize)>, CodecError> {
    if head.len() < CHECKSUM_LEN + FRAME_HEADER_LEN {
        return Ok(None);
    }
    let mut view = &head[CHECKSUM_LEN..];
    let method = view.read_u8().unwrap_or_default();
    let size_with_header = view.read_u32_le().unwrap_or_default();
    let uncompressed = view.read_u32_le().unwrap_or_default();
    if method != LZ4_METHOD {
        return Err(CodecError::ProtocolStateError(format!(
            "compression method 0x{method:02X}, expected 0x{LZ4_METHOD:02X}"
        )));
    }
    for (what, size) in [("frame", size_with_header), ("uncompressed", uncompressed)] {
        if size > i32::MAX as u32 {
            return Err(CodecError::ProtocolLimitExceeded(format!(
                "{what} size {size} exceeds {}",
                i32::MAX
            )));
        }
    }
    if (size_with_header as usize) < FRAME_HEADER_LEN {
        return Err(CodecError::ProtocolStateError(format!(
            "frame size {size_with_header} is shorter than its header"
        )));
    }
    let (size_with_header, uncompressed) = (size_with_header as usize, uncompressed as usize);
    let compressed = size_with_header - FRAME_HEADER_LEN;
    if uncompressed > compressed * MAX_EXPANSION + FRAME_HEADER_LEN {
        return Err(CodecError::ProtocolStateError(format!(
            "{compressed} compressed bytes cannot expand to {uncompressed}"
        )));
    }
    Ok(Some((size_with_header, uncompressed)))
}
