use chrono_tz::Tz;

use super::descriptor::{IntervalUnit, TypeKind};
use super::format::PhysicalType;
use super::type_spec::parse_descriptor;
use crate::codec::errors::CodecError;

#[test]
fn parses_plain_scalar() {
    let d = parse_descriptor("id", "UInt64").unwrap();
    assert_eq!(d.name(), "id");
    assert_eq!(d.kind(), &TypeKind::UInt64);
    assert_eq!(d.element_width(), Some(8));
    assert!(!d.is_nullable());
    assert!(!d.is_array());
    assert!(d.is_unsigned());
}

#[test]
fn strips_wrappers_left_to_right() {
    let d = parse_descriptor("tags", "Array(Array(LowCardinality(Nullable(String))))").unwrap();
    assert_eq!(d.array_dimensions(), 2);
    assert_eq!(d.nested_type(), "String");
    assert!(!d.is_nullable());
    assert!(!d.is_low_cardinality());

    let leaf = d.nested().unwrap();
    assert!(leaf.is_nullable());
    assert!(leaf.is_low_cardinality());
    assert!(!leaf.has_nulls_map());
    assert_eq!(leaf.raw_type(), "LowCardinality(Nullable(String))");

    let index = leaf.index_descriptor();
    assert!(!index.is_nullable());
    assert!(!index.is_low_cardinality());
    assert_eq!(index.kind(), &TypeKind::String);
}

#[test]
fn parses_parameterized_types() {
    let fixed = parse_descriptor("c", "FixedString(3)").unwrap();
    assert_eq!(fixed.physical(), PhysicalType::FixedBytes(3));

    let dt = parse_descriptor("c", "DateTime('Europe/Amsterdam')").unwrap();
    assert_eq!(
        dt.kind(),
        &TypeKind::DateTime {
            timezone: Some(Tz::Europe__Amsterdam)
        }
    );

    let dt64 = parse_descriptor("c", "DateTime64(3, 'UTC')").unwrap();
    assert_eq!(dt64.precision(), Some(3));
    assert_eq!(dt64.element_width(), Some(8));

    let iv = parse_descriptor("c", "IntervalMinute").unwrap();
    assert_eq!(iv.kind(), &TypeKind::Interval(IntervalUnit::Minute));
}

#[test]
fn decimal_width_follows_precision() {
    let cases = [
        ("Decimal(9, 2)", 4, 9, 2),
        ("Decimal(18,4)", 8, 18, 4),
        ("Decimal128(10)", 16, 38, 10),
        ("Decimal256(20)", 32, 76, 20),
        ("Decimal32(0)", 4, 9, 0),
    ];
    for (spec, width, precision, scale) in cases {
        let d = parse_descriptor("d", spec).unwrap();
        assert_eq!(d.element_width(), Some(width), "{spec}");
        assert_eq!(d.precision(), Some(precision), "{spec}");
        assert_eq!(d.scale(), Some(scale), "{spec}");
    }
}

#[test]
fn parses_enum_tables_with_quoted_names() {
    let d = parse_descriptor("e", "Enum8('a' = 1, 'it\\'s' = -2, 'x,y' = 3)").unwrap();
    let table = d.enum_table().unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.name_of(-2), Some("it's"));
    assert_eq!(table.key_of("x,y"), Some(3));
    assert_eq!(d.element_width(), Some(1));

    let wide = parse_descriptor("e", "Enum16('big' = 1000)").unwrap();
    assert_eq!(wide.enum_table().unwrap().key_of("big"), Some(1000));
}

#[test]
fn rejects_unknown_and_malformed_specs() {
    for spec in [
        "Map(String, UInt8)",
        "Decimal(77, 2)",
        "Decimal(5, 6)",
        "FixedString(0)",
        "DateTime('Not/AZone')",
        "DateTime64(10)",
        "Enum8('a' = 300)",
        "Nullable(Array(UInt8))",
        "IntervalFortnight",
    ] {
        assert!(
            matches!(parse_descriptor("c", spec), Err(CodecError::UnsupportedType(_))),
            "{spec} should be rejected"
        );
    }
}
