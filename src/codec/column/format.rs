/// On-the-wire layout of one column element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    I128,
    F32,
    F64,
    FixedBytes(usize),
    VarBytes,
}

impl PhysicalType {
    /// Encoded width in bytes, `None` for length-prefixed values.
    pub fn width(&self) -> Option<usize> {
        match self {
            PhysicalType::U8 | PhysicalType::I8 => Some(1),
            PhysicalType::U16 | PhysicalType::I16 => Some(2),
            PhysicalType::U32 | PhysicalType::I32 | PhysicalType::F32 => Some(4),
            PhysicalType::U64 | PhysicalType::I64 | PhysicalType::F64 => Some(8),
            PhysicalType::I128 => Some(16),
            PhysicalType::FixedBytes(n) => Some(*n),
            PhysicalType::VarBytes => None,
        }
    }

    /// Unsigned key layout for a low-cardinality key width code (0..=3).
    pub fn for_key_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(PhysicalType::U8),
            1 => Some(PhysicalType::U16),
            2 => Some(PhysicalType::U32),
            3 => Some(PhysicalType::U64),
            _ => None,
        }
    }
}

/// Smallest key width code whose unsigned range covers `dictionary_size`.
pub fn key_code_for(dictionary_size: usize) -> u64 {
    let size = dictionary_size as u64;
    if size <= u64::from(u8::MAX) {
        0
    } else if size <= u64::from(u16::MAX) {
        1
    } else if size <= u64::from(u32::MAX) {
        2
    } else {
        3
    }
}

pub const ARRAY_OFFSET_WIDTH: usize = 8;
pub const LOW_CARDINALITY_KEYS_VERSION: u64 = 1;

pub const NEED_GLOBAL_DICTIONARY_BIT: u64 = 1 << 8;
pub const HAS_ADDITIONAL_KEYS_BIT: u64 = 1 << 9;
pub const NEED_UPDATE_DICTIONARY_BIT: u64 = 1 << 10;
pub const KEY_WIDTH_MASK: u64 = 0x0f;
