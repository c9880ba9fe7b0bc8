use std::net::Ipv4Addr;
use std::sync::Arc;

use bytes::Bytes;
use chrono::NaiveDate;
use chrono_tz::Tz;
use uuid::Uuid;

use super::decoded::{Column, ColumnData};
use super::representation::Representation;
use super::values::ColumnValues;
use crate::codec::errors::CodecError;
use crate::codec::settings::{CodecSettings, EnumResolution};
use crate::codec::types::{Decimal, Value};
use crate::test_helpers::factories::DescriptorFactory;

fn column_with(spec: &str, values: ColumnValues, settings: CodecSettings) -> Column {
    Column::new(
        DescriptorFactory::of(spec),
        Arc::new(settings),
        ColumnData::Scalar {
            values,
            nulls: None,
        },
    )
}

fn column(spec: &str, values: ColumnValues) -> Column {
    column_with(spec, values, CodecSettings::default())
}

fn first(column: &Column, repr: Representation) -> Value {
    column.element(0, repr).unwrap()
}

#[test]
fn date_counts_days_from_epoch() {
    let c = column("Date", ColumnValues::U16(vec![19_000]));
    let expected = NaiveDate::from_ymd_opt(2022, 1, 8).unwrap();
    assert_eq!(first(&c, Representation::Native), Value::Date(expected));
    assert_eq!(first(&c, Representation::Number), Value::Int64(19_000));
    assert_eq!(first(&c, Representation::Text), Value::String("2022-01-08".into()));
}

#[test]
fn datetime_uses_column_timezone_over_default() {
    let c = column("DateTime('Europe/Berlin')", ColumnValues::U32(vec![0]));
    assert_eq!(
        first(&c, Representation::Text),
        Value::String("1970-01-01T01:00:00+01:00".into())
    );

    let settings = CodecSettings {
        default_timezone: Tz::Asia__Tokyo,
        ..CodecSettings::default()
    };
    let c = column_with("DateTime", ColumnValues::U32(vec![0]), settings);
    assert_eq!(
        first(&c, Representation::Text),
        Value::String("1970-01-01T09:00:00+09:00".into())
    );
}

#[test]
fn datetime64_splits_ticks_into_nanos() {
    let c = column("DateTime64(3, 'UTC')", ColumnValues::I64(vec![1_500, -1]));
    match first(&c, Representation::Native) {
        Value::DateTime(dt) => {
            assert_eq!(dt.timestamp(), 1);
            assert_eq!(dt.timestamp_subsec_nanos(), 500_000_000);
        }
        other => panic!("expected datetime, got {other:?}"),
    }
    match c.element(1, Representation::Native).unwrap() {
        Value::DateTime(dt) => {
            assert_eq!(dt.timestamp(), -1);
            assert_eq!(dt.timestamp_subsec_nanos(), 999_000_000);
        }
        other => panic!("expected datetime, got {other:?}"),
    }
}

#[test]
fn decimal_keeps_column_scale() {
    let c = column("Decimal(9, 2)", ColumnValues::I32(vec![-12_345]));
    assert_eq!(
        first(&c, Representation::Native),
        Value::Decimal(Decimal::from_i128(-12_345, 2))
    );
    assert_eq!(first(&c, Representation::Text), Value::String("-123.45".into()));
    assert_eq!(first(&c, Representation::Number), Value::Float64(-123.45));
}

#[test]
fn enum_resolution_follows_settings() {
    let spec = "Enum8('low' = 1, 'high' = 2)";
    let c = column(spec, ColumnValues::I8(vec![2]));
    assert_eq!(first(&c, Representation::Native), Value::String("high".into()));
    assert_eq!(first(&c, Representation::Number), Value::Int8(2));

    let settings = CodecSettings {
        enum_resolution: EnumResolution::Key,
        ..CodecSettings::default()
    };
    let c = column_with(spec, ColumnValues::I8(vec![2]), settings);
    assert_eq!(first(&c, Representation::Native), Value::Int8(2));
    assert_eq!(first(&c, Representation::Text), Value::String("high".into()));
}

#[test]
fn unknown_enum_key_is_a_protocol_error() {
    let c = column("Enum16('a' = 1000)", ColumnValues::I16(vec![7]));
    let err = c.element(0, Representation::Native).unwrap_err();
    assert!(matches!(err, CodecError::ProtocolStateError(_)));
}

#[test]
fn uuid_halves_are_little_endian_high_first() {
    let uuid = Uuid::parse_str("0123456789abcdef0011223344556677").unwrap();
    let (high, low) = uuid.as_u64_pair();
    let mut raw = high.to_le_bytes().to_vec();
    raw.extend_from_slice(&low.to_le_bytes());
    let c = column("UUID", ColumnValues::Bytes(vec![Bytes::from(raw)]));

    assert_eq!(first(&c, Representation::Native), Value::Uuid(uuid));
    assert_eq!(
        first(&c, Representation::Bytes),
        Value::Bytes(uuid.as_bytes().to_vec())
    );
    assert_eq!(
        first(&c, Representation::Text),
        Value::String("01234567-89ab-cdef-0011-223344556677".into())
    );
}

#[test]
fn ipv4_renders_in_every_representation() {
    let ip = Ipv4Addr::new(10, 0, 0, 1);
    let c = column("IPv4", ColumnValues::U32(vec![u32::from(ip)]));
    assert_eq!(first(&c, Representation::Native), Value::Ipv4(ip));
    assert_eq!(first(&c, Representation::Text), Value::String("10.0.0.1".into()));
    assert_eq!(first(&c, Representation::Number), Value::UInt32(u32::from(ip)));
    assert_eq!(first(&c, Representation::Bytes), Value::Bytes(vec![10, 0, 0, 1]));
}

#[test]
fn fixed_string_trailing_zeros_are_trimmed_when_configured() {
    let raw = ColumnValues::Bytes(vec![Bytes::from_static(b"ab\0\0")]);
    let c = column("FixedString(4)", raw.clone());
    assert_eq!(first(&c, Representation::Native), Value::String("ab".into()));
    assert_eq!(first(&c, Representation::Bytes), Value::Bytes(b"ab\0\0".to_vec()));

    let settings = CodecSettings {
        trim_fixed_string_zeros: false,
        ..CodecSettings::default()
    };
    let c = column_with("FixedString(4)", raw, settings);
    assert_eq!(first(&c, Representation::Native), Value::String("ab\0\0".into()));
}

#[test]
fn interval_scales_by_configured_unit() {
    let c = column("IntervalMonth", ColumnValues::I64(vec![2]));
    assert_eq!(
        first(&c, Representation::Native),
        Value::Interval(chrono::Duration::days(60))
    );
    assert_eq!(first(&c, Representation::Text), Value::String("2 Month".into()));
    assert_eq!(first(&c, Representation::Number), Value::Int64(2));
}

#[test]
fn unsupported_representation_is_reported() {
    let c = column("Int32", ColumnValues::I32(vec![5]));
    let err = c.element(0, Representation::Bytes).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedRepresentation { .. }));

    let c = column("String", ColumnValues::Bytes(vec![Bytes::from_static(b"x")]));
    assert!(c.element(0, Representation::Number).is_err());
}
