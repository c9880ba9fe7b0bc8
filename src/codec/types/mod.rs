mod decimal;


use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;
use serde_json::{Number, Value as JsonValue};
use uuid::Uuid;

pub use decimal::{Decimal, ParseDecimalError};

/// Application-level value of one row in one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    UInt8(u8),
    Int8(i8),
    UInt16(u16),
    Int16(i16),
    UInt32(u32),
    Int32(i32),
    UInt64(u64),
    Int64(i64),
    Int128(i128),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(DateTime<Tz>),
    Decimal(Decimal),
    Uuid(Uuid),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Interval(Duration),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::UInt8(_) => "UInt8",
            Value::Int8(_) => "Int8",
            Value::UInt16(_) => "UInt16",
            Value::Int16(_) => "Int16",
            Value::UInt32(_) => "UInt32",
            Value::Int32(_) => "Int32",
            Value::UInt64(_) => "UInt64",
            Value::Int64(_) => "Int64",
            Value::Int128(_) => "Int128",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::Decimal(_) => "Decimal",
            Value::Uuid(_) => "UUID",
            Value::Ipv4(_) => "IPv4",
            Value::Ipv6(_) => "IPv6",
            Value::Interval(_) => "Interval",
            Value::Array(_) => "Array",
        }
    }

    /// Integer view of any integral value, used for range-checked encoding.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Bool(b) => Some(i128::from(*b)),
            Value::UInt8(v) => Some(i128::from(*v)),
            Value::Int8(v) => Some(i128::from(*v)),
            Value::UInt16(v) => Some(i128::from(*v)),
            Value::Int16(v) => Some(i128::from(*v)),
            Value::UInt32(v) => Some(i128::from(*v)),
            Value::Int32(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            Value::Int128(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            other => other.as_i128().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Raw byte content of string-like values.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(s) => Some(s.as_bytes()),
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::UInt8(v) => JsonValue::from(*v),
            Value::Int8(v) => JsonValue::from(*v),
            Value::UInt16(v) => JsonValue::from(*v),
            Value::Int16(v) => JsonValue::from(*v),
            Value::UInt32(v) => JsonValue::from(*v),
            Value::Int32(v) => JsonValue::from(*v),
            Value::UInt64(v) => JsonValue::from(*v),
            Value::Int64(v) => JsonValue::from(*v),
            // Wider than any JSON number type
            Value::Int128(v) => JsonValue::String(v.to_string()),
            Value::Float32(v) => Number::from_f64(f64::from(*v))
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Float64(v) => Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(hex::encode(b)),
            Value::Date(d) => JsonValue::String(d.to_string()),
            Value::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            Value::Decimal(d) => JsonValue::String(d.to_string()),
            Value::Uuid(u) => JsonValue::String(u.to_string()),
            Value::Ipv4(ip) => JsonValue::String(ip.to_string()),
            Value::Ipv6(ip) => JsonValue::String(ip.to_string()),
            Value::Interval(d) => JsonValue::from(d.num_seconds()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
