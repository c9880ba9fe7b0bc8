use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use arrow_buffer::i256;
use bytes::BufMut;
use uuid::Uuid;

use crate::codec::column::representation::{epoch_date, interval_seconds, pow10};
use crate::codec::column::{ColumnDescriptor, NullsMap, PhysicalType, TypeKind};
use crate::codec::cursor::WireSink;
use crate::codec::errors::CodecError;
use crate::codec::settings::CodecSettings;
use crate::codec::types::{Decimal, Value};

/// Encodes plain column values, one per row.
#[derive(Clone, Debug)]
pub struct ScalarWriter {
    descriptor: Arc<ColumnDescriptor>,
    settings: Arc<CodecSettings>,
}

impl ScalarWriter {
    pub fn new(descriptor: Arc<ColumnDescriptor>, settings: Arc<CodecSettings>) -> Self {
        Self {
            descriptor,
            settings,
        }
    }

    pub fn descriptor(&self) -> &Arc<ColumnDescriptor> {
        &self.descriptor
    }

    pub fn serialize_nulls_map<B: BufMut + ?Sized>(&self, sink: &mut B, values: &[&Value]) {
        if self.descriptor.has_nulls_map() {
            NullsMap::write(sink, values.iter().map(|v| v.is_null()));
        }
    }

    pub fn serialize_data<B: BufMut + ?Sized>(
        &self,
        sink: &mut B,
        values: &[&Value],
    ) -> Result<(), CodecError> {
        for value in values {
            if value.is_null() {
                if !self.descriptor.is_nullable() && *self.descriptor.kind() != TypeKind::Nothing {
                    return Err(CodecError::ValueOutOfRange(format!(
                        "null in non-nullable column '{}'",
                        self.descriptor.name()
                    )));
                }
                self.encode_null(sink);
            } else {
                self.encode(sink, value)?;
            }
        }
        Ok(())
    }

    /// Zero fill for fixed widths (epoch for dates), empty string for strings.
    pub fn encode_null<B: BufMut + ?Sized>(&self, sink: &mut B) {
        match self.descriptor.physical().width() {
            Some(width) => sink.put_bytes(0, width),
            None => sink.put_varint(0),
        }
    }

    pub fn encode<B: BufMut + ?Sized>(&self, sink: &mut B, value: &Value) -> Result<(), CodecError> {
        let descriptor = &self.descriptor;
        match descriptor.kind() {
            TypeKind::Nothing => sink.put_u8(0),
            TypeKind::Bool => {
                let flag = match value {
                    Value::Bool(b) => *b,
                    other => self.integer(other)? != 0,
                };
                sink.put_u8(u8::from(flag));
            }
            TypeKind::UInt8
            | TypeKind::Int8
            | TypeKind::UInt16
            | TypeKind::Int16
            | TypeKind::UInt32
            | TypeKind::Int32
            | TypeKind::UInt64
            | TypeKind::Int64
            | TypeKind::Int128 => {
                let v = self.integer(value)?;
                put_int(sink, descriptor.physical(), v);
            }
            TypeKind::Float32 => sink.put_f32_le(self.float(value)? as f32),
            TypeKind::Float64 => sink.put_f64_le(self.float(value)?),
            TypeKind::String => sink.put_pascal_bytes(self.bytes(value)?),
            TypeKind::FixedString(n) => {
                let raw = self.bytes(value)?;
                if raw.len() > *n {
                    return Err(self.out_of_range(format!(
                        "{} bytes do not fit FixedString({n})",
                        raw.len()
                    )));
                }
                sink.put_slice(raw);
                sink.put_bytes(0, n - raw.len());
            }
            TypeKind::Date => {
                let days = match value {
                    Value::Date(d) => d.signed_duration_since(epoch_date()).num_days(),
                    Value::DateTime(dt) => dt
                        .date_naive()
                        .signed_duration_since(epoch_date())
                        .num_days(),
                    other => self.integer(other)? as i64,
                };
                let days = u16::try_from(days)
                    .map_err(|_| self.out_of_range(format!("date {days} days from epoch")))?;
                sink.put_u16_le(days);
            }
            TypeKind::DateTime { .. } => {
                let seconds = match value {
                    Value::DateTime(dt) => dt.timestamp(),
                    other => self.integer(other)? as i64,
                };
                let seconds = u32::try_from(seconds)
                    .map_err(|_| self.out_of_range(format!("timestamp {seconds}s")))?;
                sink.put_u32_le(seconds);
            }
            TypeKind::DateTime64 { precision, .. } => {
                let ticks = match value {
                    Value::DateTime(dt) => self.ticks(dt.timestamp(), dt.timestamp_subsec_nanos(), *precision)?,
                    other => i64::try_from(self.integer(other)?)
                        .map_err(|_| self.out_of_range("tick count".to_string()))?,
                };
                sink.put_i64_le(ticks);
            }
            TypeKind::Decimal { precision, scale } => {
                let mantissa = self.decimal_mantissa(value, *precision, *scale)?;
                match descriptor.physical() {
                    PhysicalType::FixedBytes(_) => sink.put_slice(&mantissa.to_le_bytes()),
                    physical => {
                        let small = mantissa
                            .to_i128()
                            .ok_or_else(|| self.out_of_range(format!("decimal {mantissa}")))?;
                        put_int(sink, physical, small);
                    }
                }
            }
            TypeKind::Enum8(table) | TypeKind::Enum16(table) => {
                let key = match value {
                    Value::String(name) => table.key_of(name).ok_or_else(|| {
                        self.out_of_range(format!("'{name}' is not an enum member"))
                    })?,
                    other => {
                        let key = i16::try_from(self.integer(other)?)
                            .map_err(|_| self.out_of_range("enum key".to_string()))?;
                        if !table.contains_key(key) {
                            return Err(self.out_of_range(format!("{key} is not an enum key")));
                        }
                        key
                    }
                };
                match descriptor.kind() {
                    TypeKind::Enum8(_) => sink.put_i8(key as i8),
                    _ => sink.put_i16_le(key),
                }
            }
            TypeKind::Uuid => {
                let uuid = match value {
                    Value::Uuid(u) => *u,
                    Value::String(s) => Uuid::parse_str(s)
                        .map_err(|e| self.out_of_range(format!("uuid '{s}': {e}")))?,
                    other => return Err(self.mismatch(other)),
                };
                let (high, low) = uuid.as_u64_pair();
                sink.put_u64_le(high);
                sink.put_u64_le(low);
            }
            TypeKind::Ipv4 => {
                let ip = match value {
                    Value::Ipv4(ip) => *ip,
                    Value::String(s) => s
                        .parse::<Ipv4Addr>()
                        .map_err(|e| self.out_of_range(format!("ipv4 '{s}': {e}")))?,
                    other => Ipv4Addr::from(
                        u32::try_from(self.integer(other)?)
                            .map_err(|_| self.out_of_range("ipv4 address".to_string()))?,
                    ),
                };
                sink.put_u32_le(u32::from(ip));
            }
            TypeKind::Ipv6 => {
                let ip = match value {
                    Value::Ipv6(ip) => *ip,
                    Value::Ipv4(ip) => ip.to_ipv6_mapped(),
                    Value::String(s) => match s.parse::<IpAddr>() {
                        Ok(IpAddr::V6(ip)) => ip,
                        Ok(IpAddr::V4(ip)) => ip.to_ipv6_mapped(),
                        Err(e) => return Err(self.out_of_range(format!("ipv6 '{s}': {e}"))),
                    },
                    Value::Bytes(raw) => Ipv6Addr::from(
                        <[u8; 16]>::try_from(raw.as_slice())
                            .map_err(|_| self.out_of_range("ipv6 needs 16 bytes".to_string()))?,
                    ),
                    other => return Err(self.mismatch(other)),
                };
                sink.put_slice(&ip.octets());
            }
            TypeKind::Interval(unit) => {
                let amount = match value {
                    Value::Interval(d) => {
                        let unit_seconds = interval_seconds(*unit, &self.settings);
                        let seconds = d.num_seconds();
                        if unit_seconds == 0 || seconds % unit_seconds != 0 {
                            return Err(self.out_of_range(format!(
                                "{seconds}s is not a whole number of {}s",
                                unit.as_str()
                            )));
                        }
                        seconds / unit_seconds
                    }
                    other => i64::try_from(self.integer(other)?)
                        .map_err(|_| self.out_of_range("interval".to_string()))?,
                };
                sink.put_i64_le(amount);
            }
        }
        Ok(())
    }

    fn integer(&self, value: &Value) -> Result<i128, CodecError> {
        let v = value.as_i128().ok_or_else(|| self.mismatch(value))?;
        if let Some((min, max)) = self.descriptor.kind().integer_range() {
            if v < min || v > max {
                return Err(self.out_of_range(format!("{v} outside [{min}, {max}]")));
            }
        }
        Ok(v)
    }

    fn float(&self, value: &Value) -> Result<f64, CodecError> {
        value.as_f64().ok_or_else(|| self.mismatch(value))
    }

    fn bytes<'a>(&self, value: &'a Value) -> Result<&'a [u8], CodecError> {
        value.as_bytes().ok_or_else(|| self.mismatch(value))
    }

    fn ticks(&self, seconds: i64, nanos: u32, precision: u32) -> Result<i64, CodecError> {
        let divisor = pow10(9 - precision);
        let nanos = i64::from(nanos);
        if nanos % divisor != 0 && !self.settings.saturate_extra_nanos {
            return Err(self.out_of_range(format!(
                "{nanos}ns is finer than DateTime64({precision})"
            )));
        }
        seconds
            .checked_mul(pow10(precision))
            .and_then(|t| t.checked_add(nanos / divisor))
            .ok_or_else(|| self.out_of_range(format!("timestamp {seconds}s")))
    }

    fn decimal_mantissa(&self, value: &Value, precision: u32, scale: u32) -> Result<i256, CodecError> {
        let decimal = match value {
            Value::Decimal(d) => *d,
            Value::String(s) => s
                .parse::<Decimal>()
                .map_err(|e| self.out_of_range(e.to_string()))?,
            other => match other.as_i128() {
                Some(v) => Decimal::from_i128(v, 0),
                None => return Err(self.mismatch(other)),
            },
        };
        if decimal.scale() > scale {
            return Err(self.out_of_range(format!(
                "{decimal} has scale {}, column scale is {scale}",
                decimal.scale()
            )));
        }
        let factor = i256::from_i128(10)
            .checked_pow(scale - decimal.scale())
            .ok_or_else(|| self.out_of_range(format!("scale {scale}")))?;
        let mantissa = decimal
            .mantissa()
            .checked_mul(factor)
            .ok_or_else(|| self.out_of_range(format!("{decimal} overflows")))?;
        if Decimal::new(mantissa, scale).digits() > precision {
            return Err(self.out_of_range(format!(
                "{decimal} exceeds Decimal({precision}, {scale})"
            )));
        }
        Ok(mantissa)
    }

    fn out_of_range(&self, detail: String) -> CodecError {
        CodecError::ValueOutOfRange(format!("column '{}': {detail}", self.descriptor.name()))
    }

    fn mismatch(&self, value: &Value) -> CodecError {
        self.out_of_range(format!(
            "cannot store {} in {}",
            value.type_name(),
            self.descriptor.raw_type()
        ))
    }
}

/// Writes an already range-checked integer at the physical width.
fn put_int<B: BufMut + ?Sized>(sink: &mut B, physical: PhysicalType, v: i128) {
    match physical {
        PhysicalType::U8 => sink.put_u8(v as u8),
        PhysicalType::I8 => sink.put_i8(v as i8),
        PhysicalType::U16 => sink.put_u16_le(v as u16),
        PhysicalType::I16 => sink.put_i16_le(v as i16),
        PhysicalType::U32 => sink.put_u32_le(v as u32),
        PhysicalType::I32 => sink.put_i32_le(v as i32),
        PhysicalType::U64 => sink.put_u64_le(v as u64),
        PhysicalType::I64 => sink.put_i64_le(v as i64),
        _ => sink.put_i128_le(v),
    }
}
