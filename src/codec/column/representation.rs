use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use arrow_buffer::i256;
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::codec::column::descriptor::{ColumnDescriptor, IntervalUnit, TypeKind};
use crate::codec::column::values::ColumnValues;
use crate::codec::errors::CodecError;
use crate::codec::settings::{CodecSettings, EnumResolution};
use crate::codec::types::{Decimal, Value};

/// Shape a caller wants an element decoded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    /// The natural value for the column kind.
    Native,
    Text,
    Bytes,
    Number,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Representation::Native => "native",
            Representation::Text => "text",
            Representation::Bytes => "bytes",
            Representation::Number => "number",
        };
        f.write_str(name)
    }
}

pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

pub(crate) fn epoch_date() -> NaiveDate {
    // chrono's default date is 1970-01-01
    NaiveDate::default()
}

pub(crate) fn pow10(exp: u32) -> i64 {
    10i64.pow(exp)
}

/// Seconds in one unit of an interval column.
pub(crate) fn interval_seconds(unit: IntervalUnit, settings: &CodecSettings) -> i64 {
    match unit {
        IntervalUnit::Second => 1,
        IntervalUnit::Minute => 60,
        IntervalUnit::Hour => 3_600,
        IntervalUnit::Day => SECONDS_PER_DAY,
        IntervalUnit::Week => 7 * SECONDS_PER_DAY,
        IntervalUnit::Month => settings.days_in_month * SECONDS_PER_DAY,
        IntervalUnit::Quarter => settings.days_in_quarter * SECONDS_PER_DAY,
        IntervalUnit::Year => settings.days_in_year * SECONDS_PER_DAY,
    }
}

pub(crate) fn column_timezone(tz: &Option<Tz>, settings: &CodecSettings) -> Tz {
    tz.unwrap_or(settings.default_timezone)
}

/// Decodes element `index` of a non-null scalar slot.
pub(crate) fn convert(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    index: usize,
    representation: Representation,
    settings: &CodecSettings,
) -> Result<Value, CodecError> {
    match representation {
        Representation::Native => native(descriptor, values, index, settings),
        Representation::Text => text(descriptor, values, index, settings),
        Representation::Bytes => bytes(descriptor, values, index),
        Representation::Number => number(descriptor, values, index, settings),
    }
}

fn native(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    index: usize,
    settings: &CodecSettings,
) -> Result<Value, CodecError> {
    let value = match descriptor.kind() {
        TypeKind::Nothing => Value::Null,
        TypeKind::Bool => Value::Bool(int(values, index)? != 0),
        TypeKind::UInt8 => Value::UInt8(int(values, index)? as u8),
        TypeKind::Int8 => Value::Int8(int(values, index)? as i8),
        TypeKind::UInt16 => Value::UInt16(int(values, index)? as u16),
        TypeKind::Int16 => Value::Int16(int(values, index)? as i16),
        TypeKind::UInt32 => Value::UInt32(int(values, index)? as u32),
        TypeKind::Int32 => Value::Int32(int(values, index)? as i32),
        TypeKind::UInt64 => Value::UInt64(int(values, index)? as u64),
        TypeKind::Int64 => Value::Int64(int(values, index)? as i64),
        TypeKind::Int128 => Value::Int128(int(values, index)?),
        TypeKind::Float32 => Value::Float32(float(values, index)? as f32),
        TypeKind::Float64 => Value::Float64(float(values, index)?),
        TypeKind::String | TypeKind::FixedString(_) => {
            let raw = string_bytes(descriptor, values, index, settings)?;
            match std::str::from_utf8(raw) {
                Ok(s) => Value::String(s.to_string()),
                Err(_) => Value::Bytes(raw.to_vec()),
            }
        }
        TypeKind::Date => Value::Date(date(values, index)?),
        TypeKind::DateTime { timezone } => {
            let tz = column_timezone(timezone, settings);
            Value::DateTime(zoned(tz, int(values, index)? as i64, 0)?)
        }
        TypeKind::DateTime64 {
            precision,
            timezone,
        } => {
            let tz = column_timezone(timezone, settings);
            let ticks = int(values, index)? as i64;
            let per_second = pow10(*precision);
            let nanos = ticks.rem_euclid(per_second) * pow10(9 - precision);
            Value::DateTime(zoned(tz, ticks.div_euclid(per_second), nanos as u32)?)
        }
        TypeKind::Decimal { scale, .. } => Value::Decimal(decimal(values, index, *scale)?),
        TypeKind::Enum8(table) | TypeKind::Enum16(table) => {
            let key = int(values, index)? as i16;
            let name = table.name_of(key).ok_or_else(|| {
                CodecError::ProtocolStateError(format!(
                    "unknown key {key} for enum column '{}'",
                    descriptor.name()
                ))
            })?;
            match (settings.enum_resolution, descriptor.kind()) {
                (EnumResolution::Name, _) => Value::String(name.to_string()),
                (EnumResolution::Key, TypeKind::Enum8(_)) => Value::Int8(key as i8),
                (EnumResolution::Key, _) => Value::Int16(key),
            }
        }
        TypeKind::Uuid => uuid_at(values, index)?,
        TypeKind::Ipv4 => Value::Ipv4(Ipv4Addr::from(int(values, index)? as u32)),
        TypeKind::Ipv6 => Value::Ipv6(Ipv6Addr::from(fixed::<16>(values, index)?)),
        TypeKind::Interval(unit) => {
            let amount = int(values, index)? as i64;
            let seconds = amount
                .checked_mul(interval_seconds(*unit, settings))
                .and_then(Duration::try_seconds)
                .ok_or_else(|| {
                    CodecError::ValueOutOfRange(format!(
                        "interval {amount} {} overflows a duration",
                        unit.as_str()
                    ))
                })?;
            Value::Interval(seconds)
        }
    };
    Ok(value)
}

fn text(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    index: usize,
    settings: &CodecSettings,
) -> Result<Value, CodecError> {
    let rendered = match descriptor.kind() {
        TypeKind::Nothing => return Ok(Value::Null),
        TypeKind::String | TypeKind::FixedString(_) => {
            let raw = string_bytes(descriptor, values, index, settings)?;
            String::from_utf8_lossy(raw).into_owned()
        }
        TypeKind::Enum8(table) | TypeKind::Enum16(table) => {
            let key = int(values, index)? as i16;
            table.name_of(key).map(str::to_string).ok_or_else(|| {
                CodecError::ProtocolStateError(format!(
                    "unknown key {key} for enum column '{}'",
                    descriptor.name()
                ))
            })?
        }
        TypeKind::Interval(unit) => format!("{} {}", int(values, index)?, unit.as_str()),
        _ => match native(descriptor, values, index, settings)? {
            Value::DateTime(dt) => dt.to_rfc3339(),
            other => plain_text(&other),
        },
    };
    Ok(Value::String(rendered))
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => match other.to_json() {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    }
}

fn bytes(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    index: usize,
) -> Result<Value, CodecError> {
    match descriptor.kind() {
        TypeKind::String | TypeKind::FixedString(_) | TypeKind::Ipv6 => {
            let raw = values
                .bytes_at(index)
                .ok_or_else(|| storage_mismatch(descriptor))?;
            Ok(Value::Bytes(raw.to_vec()))
        }
        TypeKind::Ipv4 => {
            let ip = Ipv4Addr::from(int(values, index)? as u32);
            Ok(Value::Bytes(ip.octets().to_vec()))
        }
        TypeKind::Uuid => match uuid_at(values, index)? {
            Value::Uuid(u) => Ok(Value::Bytes(u.as_bytes().to_vec())),
            _ => Err(storage_mismatch(descriptor)),
        },
        _ => Err(unsupported(descriptor, Representation::Bytes)),
    }
}

/// Two little-endian u64 halves, high half first.
fn uuid_at(values: &ColumnValues, index: usize) -> Result<Value, CodecError> {
    let raw = fixed::<16>(values, index)?;
    let (high, low) = raw.split_at(8);
    let mut h = [0u8; 8];
    let mut l = [0u8; 8];
    h.copy_from_slice(high);
    l.copy_from_slice(low);
    Ok(Value::Uuid(Uuid::from_u64_pair(
        u64::from_le_bytes(h),
        u64::from_le_bytes(l),
    )))
}

fn number(
    descriptor: &ColumnDescriptor,
    values: &ColumnValues,
    index: usize,
    settings: &CodecSettings,
) -> Result<Value, CodecError> {
    match descriptor.kind() {
        TypeKind::Nothing => Ok(Value::Null),
        TypeKind::Bool => Ok(Value::UInt8(int(values, index)? as u8)),
        TypeKind::Enum8(_) => Ok(Value::Int8(int(values, index)? as i8)),
        TypeKind::Enum16(_) => Ok(Value::Int16(int(values, index)? as i16)),
        TypeKind::Ipv4 => Ok(Value::UInt32(int(values, index)? as u32)),
        TypeKind::Date
        | TypeKind::DateTime { .. }
        | TypeKind::DateTime64 { .. }
        | TypeKind::Interval(_) => Ok(Value::Int64(int(values, index)? as i64)),
        TypeKind::Decimal { scale, .. } => {
            let d = decimal(values, index, *scale)?;
            let approx = d
                .to_string()
                .parse::<f64>()
                .map_err(|_| storage_mismatch(descriptor))?;
            Ok(Value::Float64(approx))
        }
        kind if kind.integer_range().is_some() => native(descriptor, values, index, settings),
        TypeKind::Float32 | TypeKind::Float64 => native(descriptor, values, index, settings),
        _ => Err(unsupported(descriptor, Representation::Number)),
    }
}

fn int(values: &ColumnValues, index: usize) -> Result<i128, CodecError> {
    values.int_at(index).ok_or_else(|| missing(index))
}

fn float(values: &ColumnValues, index: usize) -> Result<f64, CodecError> {
    values.float_at(index).ok_or_else(|| missing(index))
}

fn fixed<const N: usize>(values: &ColumnValues, index: usize) -> Result<[u8; N], CodecError> {
    let raw = values.bytes_at(index).ok_or_else(|| missing(index))?;
    <[u8; N]>::try_from(&raw[..]).map_err(|_| {
        CodecError::ProtocolStateError(format!("expected {N} bytes, found {}", raw.len()))
    })
}

fn string_bytes<'a>(
    descriptor: &ColumnDescriptor,
    values: &'a ColumnValues,
    index: usize,
    settings: &CodecSettings,
) -> Result<&'a [u8], CodecError> {
    let raw = values.bytes_at(index).ok_or_else(|| missing(index))?;
    let trim = settings.trim_fixed_string_zeros
        && matches!(descriptor.kind(), TypeKind::FixedString(_));
    if !trim {
        return Ok(raw);
    }
    let end = raw.iter().rposition(|b| *b != 0).map_or(0, |p| p + 1);
    Ok(&raw[..end])
}

fn date(values: &ColumnValues, index: usize) -> Result<NaiveDate, CodecError> {
    let days = int(values, index)? as i64;
    epoch_date()
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| CodecError::ValueOutOfRange(format!("date offset {days} days")))
}

fn zoned(tz: Tz, seconds: i64, nanos: u32) -> Result<DateTime<Tz>, CodecError> {
    DateTime::from_timestamp(seconds, nanos)
        .map(|utc| tz.from_utc_datetime(&utc.naive_utc()))
        .ok_or_else(|| CodecError::ValueOutOfRange(format!("timestamp {seconds}s")))
}

fn decimal(values: &ColumnValues, index: usize, scale: u32) -> Result<Decimal, CodecError> {
    if let Some(mantissa) = values.int_at(index) {
        return Ok(Decimal::from_i128(mantissa, scale));
    }
    let raw = fixed::<32>(values, index)?;
    Ok(Decimal::new(i256::from_le_bytes(raw), scale))
}

fn missing(index: usize) -> CodecError {
    CodecError::ProtocolStateError(format!("no decoded value at index {index}"))
}

fn storage_mismatch(descriptor: &ColumnDescriptor) -> CodecError {
    CodecError::ProtocolStateError(format!(
        "storage does not match column '{}' of type {}",
        descriptor.name(),
        descriptor.raw_type()
    ))
}

pub(crate) fn unsupported(descriptor: &ColumnDescriptor, representation: Representation) -> CodecError {
    CodecError::UnsupportedRepresentation {
        kind: descriptor.kind().name().to_string(),
        representation: representation.to_string(),
    }
}
