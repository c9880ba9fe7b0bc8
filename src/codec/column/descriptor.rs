use std::fmt;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::codec::column::format::PhysicalType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Second" => Some(IntervalUnit::Second),
            "Minute" => Some(IntervalUnit::Minute),
            "Hour" => Some(IntervalUnit::Hour),
            "Day" => Some(IntervalUnit::Day),
            "Week" => Some(IntervalUnit::Week),
            "Month" => Some(IntervalUnit::Month),
            "Quarter" => Some(IntervalUnit::Quarter),
            "Year" => Some(IntervalUnit::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Second => "Second",
            IntervalUnit::Minute => "Minute",
            IntervalUnit::Hour => "Hour",
            IntervalUnit::Day => "Day",
            IntervalUnit::Week => "Week",
            IntervalUnit::Month => "Month",
            IntervalUnit::Quarter => "Quarter",
            IntervalUnit::Year => "Year",
        }
    }
}

/// Ordered `name = key` pairs of an `Enum8`/`Enum16` column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnumTable {
    entries: Vec<(i16, String)>,
}

impl EnumTable {
    pub fn new(entries: Vec<(i16, String)>) -> Self {
        Self { entries }
    }

    pub fn name_of(&self, key: i16) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, name)| name.as_str())
    }

    pub fn key_of(&self, name: &str) -> Option<i16> {
        self.entries.iter().find(|(_, n)| n == name).map(|(k, _)| *k)
    }

    pub fn contains_key(&self, key: i16) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn entries(&self) -> &[(i16, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Base type of a column once `Array`, `LowCardinality` and `Nullable` are stripped.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    UInt8,
    Int8,
    Bool,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Int128,
    Float32,
    Float64,
    String,
    FixedString(usize),
    Date,
    DateTime { timezone: Option<Tz> },
    DateTime64 { precision: u32, timezone: Option<Tz> },
    Decimal { precision: u32, scale: u32 },
    Enum8(EnumTable),
    Enum16(EnumTable),
    Uuid,
    Ipv4,
    Ipv6,
    Interval(IntervalUnit),
    Nothing,
}

impl TypeKind {
    pub fn physical(&self) -> PhysicalType {
        match self {
            TypeKind::UInt8 | TypeKind::Bool | TypeKind::Nothing => PhysicalType::U8,
            TypeKind::Int8 | TypeKind::Enum8(_) => PhysicalType::I8,
            TypeKind::UInt16 | TypeKind::Date => PhysicalType::U16,
            TypeKind::Int16 | TypeKind::Enum16(_) => PhysicalType::I16,
            TypeKind::UInt32 | TypeKind::DateTime { .. } | TypeKind::Ipv4 => PhysicalType::U32,
            TypeKind::Int32 => PhysicalType::I32,
            TypeKind::UInt64 => PhysicalType::U64,
            TypeKind::Int64 | TypeKind::DateTime64 { .. } | TypeKind::Interval(_) => {
                PhysicalType::I64
            }
            TypeKind::Int128 => PhysicalType::I128,
            TypeKind::Float32 => PhysicalType::F32,
            TypeKind::Float64 => PhysicalType::F64,
            TypeKind::String => PhysicalType::VarBytes,
            TypeKind::FixedString(n) => PhysicalType::FixedBytes(*n),
            TypeKind::Uuid | TypeKind::Ipv6 => PhysicalType::FixedBytes(16),
            TypeKind::Decimal { precision, .. } => match precision {
                0..=9 => PhysicalType::I32,
                10..=18 => PhysicalType::I64,
                19..=38 => PhysicalType::I128,
                _ => PhysicalType::FixedBytes(32),
            },
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            TypeKind::UInt8
                | TypeKind::Bool
                | TypeKind::UInt16
                | TypeKind::UInt32
                | TypeKind::UInt64
                | TypeKind::Date
                | TypeKind::DateTime { .. }
                | TypeKind::Ipv4
        )
    }

    /// Inclusive value range for plain integer kinds.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            TypeKind::UInt8 => Some((0, i128::from(u8::MAX))),
            TypeKind::Bool => Some((0, 1)),
            TypeKind::Int8 => Some((i128::from(i8::MIN), i128::from(i8::MAX))),
            TypeKind::UInt16 => Some((0, i128::from(u16::MAX))),
            TypeKind::Int16 => Some((i128::from(i16::MIN), i128::from(i16::MAX))),
            TypeKind::UInt32 => Some((0, i128::from(u32::MAX))),
            TypeKind::Int32 => Some((i128::from(i32::MIN), i128::from(i32::MAX))),
            TypeKind::UInt64 => Some((0, i128::from(u64::MAX))),
            TypeKind::Int64 => Some((i128::from(i64::MIN), i128::from(i64::MAX))),
            TypeKind::Int128 => Some((i128::MIN, i128::MAX)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::UInt8 => "UInt8",
            TypeKind::Int8 => "Int8",
            TypeKind::Bool => "Bool",
            TypeKind::UInt16 => "UInt16",
            TypeKind::Int16 => "Int16",
            TypeKind::UInt32 => "UInt32",
            TypeKind::Int32 => "Int32",
            TypeKind::UInt64 => "UInt64",
            TypeKind::Int64 => "Int64",
            TypeKind::Int128 => "Int128",
            TypeKind::Float32 => "Float32",
            TypeKind::Float64 => "Float64",
            TypeKind::String => "String",
            TypeKind::FixedString(_) => "FixedString",
            TypeKind::Date => "Date",
            TypeKind::DateTime { .. } => "DateTime",
            TypeKind::DateTime64 { .. } => "DateTime64",
            TypeKind::Decimal { .. } => "Decimal",
            TypeKind::Enum8(_) => "Enum8",
            TypeKind::Enum16(_) => "Enum16",
            TypeKind::Uuid => "UUID",
            TypeKind::Ipv4 => "IPv4",
            TypeKind::Ipv6 => "IPv6",
            TypeKind::Interval(_) => "Interval",
            TypeKind::Nothing => "Nothing",
        }
    }
}

/// Immutable parse of a column's type spec.
///
/// Array columns keep the element descriptor in `nested`; their own
/// `nullable`/`low_cardinality` flags are always false because the
/// modifiers belong to the innermost element.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDescriptor {
    name: String,
    raw_type: String,
    nested_type: String,
    kind: TypeKind,
    nullable: bool,
    low_cardinality: bool,
    array_dimensions: usize,
    nested: Option<Arc<ColumnDescriptor>>,
}

impl ColumnDescriptor {
    pub(crate) fn scalar(
        name: &str,
        raw_type: &str,
        nested_type: &str,
        kind: TypeKind,
        nullable: bool,
        low_cardinality: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            nested_type: nested_type.to_string(),
            kind,
            nullable,
            low_cardinality,
            array_dimensions: 0,
            nested: None,
        }
    }

    pub(crate) fn array(
        name: &str,
        raw_type: &str,
        dimensions: usize,
        element: ColumnDescriptor,
    ) -> Self {
        Self {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            nested_type: element.nested_type.clone(),
            kind: element.kind.clone(),
            nullable: false,
            low_cardinality: false,
            array_dimensions: dimensions,
            nested: Some(Arc::new(element)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type spec exactly as it appeared on the wire.
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    /// Base type spec with all wrappers removed.
    pub fn nested_type(&self) -> &str {
        &self.nested_type
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn physical(&self) -> PhysicalType {
        self.kind.physical()
    }

    pub fn element_width(&self) -> Option<usize> {
        self.physical().width()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_low_cardinality(&self) -> bool {
        self.low_cardinality
    }

    pub fn is_array(&self) -> bool {
        self.array_dimensions > 0
    }

    pub fn array_dimensions(&self) -> usize {
        self.array_dimensions
    }

    pub fn is_unsigned(&self) -> bool {
        self.kind.is_unsigned()
    }

    /// Element descriptor of an array column.
    pub fn nested(&self) -> Option<&Arc<ColumnDescriptor>> {
        self.nested.as_ref()
    }

    pub fn precision(&self) -> Option<u32> {
        match &self.kind {
            TypeKind::Decimal { precision, .. } | TypeKind::DateTime64 { precision, .. } => {
                Some(*precision)
            }
            _ => None,
        }
    }

    pub fn scale(&self) -> Option<u32> {
        match &self.kind {
            TypeKind::Decimal { scale, .. } => Some(*scale),
            _ => None,
        }
    }

    pub fn enum_table(&self) -> Option<&EnumTable> {
        match &self.kind {
            TypeKind::Enum8(table) | TypeKind::Enum16(table) => Some(table),
            _ => None,
        }
    }

    /// Whether a nulls map precedes this column's data.
    pub fn has_nulls_map(&self) -> bool {
        self.nullable && !self.low_cardinality && !self.is_array()
    }

    /// Copy with the given modifiers; the array shape is kept.
    pub fn with_modifiers(&self, low_cardinality: bool, nullable: bool) -> Self {
        Self {
            low_cardinality,
            nullable,
            ..self.clone()
        }
    }

    /// Plain element descriptor a low-cardinality dictionary is stored with.
    pub fn index_descriptor(&self) -> Self {
        self.with_modifiers(false, false)
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.raw_type)
    }
}
