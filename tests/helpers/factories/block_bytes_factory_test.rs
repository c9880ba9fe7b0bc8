use crate::codec::cursor::ByteCursor;
use crate::codec::types::Value;
use crate::test_helpers::factories::{BlockBytesFactory, RegistryFactory};

#[test]
fn encodes_header_then_columns() {
    let bytes = BlockBytesFactory::new()
        .with_registry(RegistryFactory::new().with_revision(51902).create())
        .with_column("n", "UInt8")
        .with_values(vec![Value::UInt8(7)])
        .create();

    let mut cursor: &[u8] = &bytes;
    assert_eq!(cursor.read_varint().unwrap(), Some(1));
    assert_eq!(cursor.read_varint().unwrap(), Some(1));
    assert_eq!(cursor.read_pascal_string().unwrap().as_deref(), Some("n"));
    assert_eq!(cursor.read_pascal_string().unwrap().as_deref(), Some("UInt8"));
    assert_eq!(cursor.read_u8(), Some(7));
    assert_eq!(cursor.available(), 0);
}
