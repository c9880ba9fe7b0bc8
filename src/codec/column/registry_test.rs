use super::descriptor::TypeKind;
use super::registry::Shape;
use crate::codec::errors::CodecError;
use crate::codec::reader::ColumnReader;
use crate::codec::writer::WriterKind;
use crate::test_helpers::factories::RegistryFactory;

#[test]
fn shape_follows_outermost_wrapper() {
    let registry = RegistryFactory::new().create();
    let shape = |spec: &str| registry.column_kind("c", spec).unwrap().shape();

    assert_eq!(shape("Int64"), Shape::Scalar);
    assert_eq!(shape("Nullable(Float64)"), Shape::Scalar);
    assert_eq!(shape("LowCardinality(String)"), Shape::Dictionary);
    assert_eq!(shape("Array(LowCardinality(String))"), Shape::Array);
}

#[test]
fn key_columns_cover_every_width_code() {
    let registry = RegistryFactory::new().create();
    let kinds: Vec<_> = (0..4)
        .map(|code| registry.key_column(code).unwrap().kind().clone())
        .collect();
    assert_eq!(
        kinds,
        vec![TypeKind::UInt8, TypeKind::UInt16, TypeKind::UInt32, TypeKind::UInt64]
    );
    assert!(registry.key_column(4).is_none());
}

#[test]
fn readers_and_writers_match_the_shape() {
    let registry = RegistryFactory::new().create();
    let kind = registry.column_kind("tags", "Array(String)").unwrap();

    assert!(matches!(kind.reader(3), ColumnReader::Array(_)));
    let writer = kind.writer(2);
    assert_eq!(writer.column_index(), 2);
    assert!(matches!(writer.kind(), WriterKind::Array(_)));

    let lc = registry.column_kind("s", "LowCardinality(String)").unwrap();
    assert!(matches!(lc.reader(1), ColumnReader::Dictionary(_)));
}

#[test]
fn unknown_type_is_unsupported() {
    let registry = RegistryFactory::new().create();
    let err = registry.column_kind("m", "Map(String, UInt8)").unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedType(_)));
}

#[test]
fn clones_share_settings() {
    let registry = RegistryFactory::new().with_revision(54000).create();
    let copy = registry.clone();
    assert!(std::sync::Arc::ptr_eq(registry.settings(), copy.settings()));
    assert_eq!(copy.settings().protocol_revision, 54000);
}
