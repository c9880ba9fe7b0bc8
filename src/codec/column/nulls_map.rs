use bytes::BufMut;

use crate::codec::cursor::ByteCursor;

/// One bit per row marking SQL NULL, decoded from one wire byte per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullsMap {
    bits: Vec<u8>,
    len: usize,
}

impl NullsMap {
    pub fn size_for(rows: usize) -> usize {
        rows.div_ceil(8)
    }

    pub fn from_flags<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        let mut map = NullsMap::default();
        for flag in flags {
            if map.len % 8 == 0 {
                map.bits.push(0);
            }
            if flag {
                Self::set_bit(&mut map.bits, map.len);
            }
            map.len += 1;
        }
        map
    }

    /// Reads `rows` flag bytes, only once all of them are available.
    pub fn read<C: ByteCursor + ?Sized>(cursor: &mut C, rows: usize) -> Option<Self> {
        if !cursor.has_bytes(rows) {
            return None;
        }
        let map = Self::from_flags(cursor.peek()[..rows].iter().map(|b| *b != 0));
        cursor.skip(rows);
        Some(map)
    }

    pub fn write<B: BufMut + ?Sized, I: IntoIterator<Item = bool>>(sink: &mut B, flags: I) {
        for flag in flags {
            sink.put_u8(u8::from(flag));
        }
    }

    fn set_bit(bitmap: &mut [u8], index: usize) {
        bitmap[index / 8] |= 1 << (index % 8);
    }

    pub fn is_null(&self, index: usize) -> bool {
        index < self.len && (self.bits[index / 8] & (1 << (index % 8))) != 0
    }

    pub fn null_count(&self) -> usize {
        (0..self.len).filter(|i| self.is_null(*i)).count()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
