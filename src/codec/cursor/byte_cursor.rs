use bytes::{Buf, Bytes, BytesMut};

use crate::codec::errors::CodecError;

pub const SIZE_U16: usize = 2;
pub const SIZE_U32: usize = 4;
pub const SIZE_U64: usize = 8;

/// Longest unsigned LEB128 encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Non-blocking view over the bytes received so far.
///
/// Every read either consumes a whole value or returns `None` and leaves
/// the cursor untouched, so a decoder can stop at any point and be called
/// again once more bytes have been appended.
pub trait ByteCursor {
    fn available(&self) -> usize;

    /// Contiguous unread bytes.
    fn peek(&self) -> &[u8];

    /// Drops `n` bytes. Returns `false` without consuming if fewer are available.
    fn skip(&mut self, n: usize) -> bool;

    fn has_bytes(&self, n: usize) -> bool {
        self.available() >= n
    }

    fn read_bytes(&mut self, n: usize) -> Option<Bytes> {
        if !self.has_bytes(n) {
            return None;
        }
        let out = Bytes::copy_from_slice(&self.peek()[..n]);
        self.skip(n);
        Some(out)
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        if !self.has_bytes(N) {
            return None;
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.peek()[..N]);
        self.skip(N);
        Some(out)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    fn read_u16_le(&mut self) -> Option<u16> {
        self.read_array::<SIZE_U16>().map(u16::from_le_bytes)
    }

    fn read_u32_le(&mut self) -> Option<u32> {
        self.read_array::<SIZE_U32>().map(u32::from_le_bytes)
    }

    fn read_i32_le(&mut self) -> Option<i32> {
        self.read_array::<SIZE_U32>().map(i32::from_le_bytes)
    }

    fn read_u64_le(&mut self) -> Option<u64> {
        self.read_array::<SIZE_U64>().map(u64::from_le_bytes)
    }

    /// Unsigned LEB128. `Ok(None)` when the encoding is not complete yet.
    fn read_varint(&mut self) -> Result<Option<u64>, CodecError> {
        match decode_varint(self.peek())? {
            Some((value, len)) => {
                self.skip(len);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Varint length followed by that many raw bytes, consumed only as a whole.
    fn read_pascal_bytes(&mut self) -> Result<Option<Bytes>, CodecError> {
        let Some((len, prefix)) = decode_varint(self.peek())? else {
            return Ok(None);
        };
        if len > i32::MAX as u64 {
            return Err(CodecError::ProtocolLimitExceeded(format!(
                "string length {len} exceeds {}",
                i32::MAX
            )));
        }
        let len = len as usize;
        match prefix.checked_add(len) {
            Some(total) if self.has_bytes(total) => {}
            _ => return Ok(None),
        }
        self.skip(prefix);
        Ok(self.read_bytes(len))
    }

    fn read_pascal_string(&mut self) -> Result<Option<String>, CodecError> {
        match self.read_pascal_bytes()? {
            Some(raw) => String::from_utf8(raw.to_vec())
                .map(Some)
                .map_err(|e| CodecError::ProtocolStateError(format!("invalid UTF-8 string: {e}"))),
            None => Ok(None),
        }
    }
}

/// Runs `parse` over a copy of the unread bytes and consumes them only if it yields a value.
///
/// Used for small headers that must be read as a unit.
pub fn read_whole<C, T, F>(cursor: &mut C, parse: F) -> Result<Option<T>, CodecError>
where
    C: ByteCursor + ?Sized,
    F: FnOnce(&mut &[u8]) -> Result<Option<T>, CodecError>,
{
    let (value, consumed) = {
        let start = cursor.peek();
        let mut view = start;
        match parse(&mut view)? {
            Some(value) => (value, start.len() - view.len()),
            None => return Ok(None),
        }
    };
    cursor.skip(consumed);
    Ok(Some(value))
}

/// Decodes a varint from the start of `buf`, returning the value and its encoded length.
pub fn decode_varint(buf: &[u8]) -> Result<Option<(u64, usize)>, CodecError> {
    let mut value: u64 = 0;
    for (i, byte) in buf.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((value, i + 1)));
        }
    }
    if buf.len() >= MAX_VARINT_LEN {
        return Err(CodecError::ProtocolStateError(
            "varint longer than 10 bytes".into(),
        ));
    }
    Ok(None)
}

impl ByteCursor for BytesMut {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek(&self) -> &[u8] {
        &self[..]
    }

    fn skip(&mut self, n: usize) -> bool {
        if self.len() < n {
            return false;
        }
        self.advance(n);
        true
    }

    fn read_bytes(&mut self, n: usize) -> Option<Bytes> {
        if self.len() < n {
            return None;
        }
        Some(self.split_to(n).freeze())
    }
}

impl ByteCursor for &[u8] {
    fn available(&self) -> usize {
        self.len()
    }

    fn peek(&self) -> &[u8] {
        self
    }

    fn skip(&mut self, n: usize) -> bool {
        if self.len() < n {
            return false;
        }
        *self = &self[n..];
        true
    }
}
