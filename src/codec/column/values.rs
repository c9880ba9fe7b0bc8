use bytes::Bytes;

use crate::codec::column::format::PhysicalType;
use crate::codec::cursor::ByteCursor;

/// Decoded storage of one scalar column, laid out by physical type.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValues {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    I128(Vec<i128>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    /// Fixed-width byte blobs and length-prefixed strings.
    Bytes(Vec<Bytes>),
}

macro_rules! decode_le {
    ($raw:expr, $ty:ty, $variant:ident) => {
        ColumnValues::$variant(
            $raw.chunks_exact(std::mem::size_of::<$ty>())
                .map(|chunk| {
                    let mut le = [0u8; std::mem::size_of::<$ty>()];
                    le.copy_from_slice(chunk);
                    <$ty>::from_le_bytes(le)
                })
                .collect(),
        )
    };
}

impl ColumnValues {
    pub fn empty(physical: PhysicalType) -> Self {
        match physical {
            PhysicalType::U8 => ColumnValues::U8(Vec::new()),
            PhysicalType::I8 => ColumnValues::I8(Vec::new()),
            PhysicalType::U16 => ColumnValues::U16(Vec::new()),
            PhysicalType::I16 => ColumnValues::I16(Vec::new()),
            PhysicalType::U32 => ColumnValues::U32(Vec::new()),
            PhysicalType::I32 => ColumnValues::I32(Vec::new()),
            PhysicalType::U64 => ColumnValues::U64(Vec::new()),
            PhysicalType::I64 => ColumnValues::I64(Vec::new()),
            PhysicalType::I128 => ColumnValues::I128(Vec::new()),
            PhysicalType::F32 => ColumnValues::F32(Vec::new()),
            PhysicalType::F64 => ColumnValues::F64(Vec::new()),
            PhysicalType::FixedBytes(_) | PhysicalType::VarBytes => {
                ColumnValues::Bytes(Vec::new())
            }
        }
    }

    /// Reads `rows` fixed-width elements in one pass, or nothing if they are not all buffered.
    pub fn read_fixed<C: ByteCursor + ?Sized>(
        cursor: &mut C,
        physical: PhysicalType,
        rows: usize,
    ) -> Option<Self> {
        let width = physical.width()?;
        let total = width.checked_mul(rows)?;
        if !cursor.has_bytes(total) {
            return None;
        }
        let values = Self::decode_fixed(&cursor.peek()[..total], physical, width);
        cursor.skip(total);
        Some(values)
    }

    fn decode_fixed(raw: &[u8], physical: PhysicalType, width: usize) -> Self {
        match physical {
            PhysicalType::U8 => ColumnValues::U8(raw.to_vec()),
            PhysicalType::I8 => ColumnValues::I8(raw.iter().map(|b| *b as i8).collect()),
            PhysicalType::U16 => decode_le!(raw, u16, U16),
            PhysicalType::I16 => decode_le!(raw, i16, I16),
            PhysicalType::U32 => decode_le!(raw, u32, U32),
            PhysicalType::I32 => decode_le!(raw, i32, I32),
            PhysicalType::U64 => decode_le!(raw, u64, U64),
            PhysicalType::I64 => decode_le!(raw, i64, I64),
            PhysicalType::I128 => decode_le!(raw, i128, I128),
            PhysicalType::F32 => decode_le!(raw, f32, F32),
            PhysicalType::F64 => decode_le!(raw, f64, F64),
            PhysicalType::FixedBytes(_) | PhysicalType::VarBytes => ColumnValues::Bytes(
                raw.chunks_exact(width)
                    .map(Bytes::copy_from_slice)
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::U8(v) => v.len(),
            ColumnValues::I8(v) => v.len(),
            ColumnValues::U16(v) => v.len(),
            ColumnValues::I16(v) => v.len(),
            ColumnValues::U32(v) => v.len(),
            ColumnValues::I32(v) => v.len(),
            ColumnValues::U64(v) => v.len(),
            ColumnValues::I64(v) => v.len(),
            ColumnValues::I128(v) => v.len(),
            ColumnValues::F32(v) => v.len(),
            ColumnValues::F64(v) => v.len(),
            ColumnValues::Bytes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer element widened to `i128`; `None` for float and byte storage.
    pub fn int_at(&self, index: usize) -> Option<i128> {
        match self {
            ColumnValues::U8(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::I8(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::U16(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::I16(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::U32(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::I32(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::U64(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::I64(v) => v.get(index).map(|x| i128::from(*x)),
            ColumnValues::I128(v) => v.get(index).copied(),
            _ => None,
        }
    }

    /// Unsigned view used for dictionary keys.
    pub fn key_at(&self, index: usize) -> Option<u64> {
        match self {
            ColumnValues::U8(v) => v.get(index).map(|x| u64::from(*x)),
            ColumnValues::U16(v) => v.get(index).map(|x| u64::from(*x)),
            ColumnValues::U32(v) => v.get(index).map(|x| u64::from(*x)),
            ColumnValues::U64(v) => v.get(index).copied(),
            _ => None,
        }
    }

    pub fn float_at(&self, index: usize) -> Option<f64> {
        match self {
            ColumnValues::F32(v) => v.get(index).map(|x| f64::from(*x)),
            ColumnValues::F64(v) => v.get(index).copied(),
            _ => None,
        }
    }

    pub fn bytes_at(&self, index: usize) -> Option<&Bytes> {
        match self {
            ColumnValues::Bytes(v) => v.get(index),
            _ => None,
        }
    }
}
