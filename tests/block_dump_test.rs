use std::io::Write;
use std::process::{Command, Output};

use bytes::BytesMut;
use serde_json::{Value as JsonValue, json};
use tempfile::NamedTempFile;

use ch_native::codec::block::BlockWriter;
use ch_native::codec::column::TypeRegistry;
use ch_native::codec::cursor::WireSink;
use ch_native::codec::settings::{CodecSettings, Compression};
use ch_native::codec::types::Value;

fn encoded_rows(rows: Vec<Vec<Value>>) -> BytesMut {
    encoded_with(CodecSettings::default(), rows)
}

fn encoded_with(settings: CodecSettings, rows: Vec<Vec<Value>>) -> BytesMut {
    let registry = TypeRegistry::new(settings);
    let descriptors = vec![
        registry.descriptor("id", "UInt32").unwrap(),
        registry.descriptor("name", "LowCardinality(Nullable(String))").unwrap(),
    ];
    let writer = BlockWriter::new(&registry, descriptors, rows).unwrap();
    let mut out = BytesMut::new();
    writer.serialize_all(&mut out).unwrap();
    out
}

fn run(bytes: &[u8], extra: &[&str]) -> Output {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(bytes).unwrap();
    Command::new(env!("CARGO_BIN_EXE_block_dump"))
        .arg(input.path())
        .args(extra)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("CH_NATIVE__LOGGING__STDOUT_LEVEL", "error")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> Vec<JsonValue> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn dumps_consecutive_blocks_as_json_lines() {
    let mut bytes = encoded_rows(vec![
        vec![Value::UInt32(1), Value::from("a")],
        vec![Value::UInt32(2), Value::Null],
    ]);
    bytes.extend_from_slice(&encoded_rows(vec![vec![Value::UInt32(3), Value::from("a")]]));

    let output = run(&bytes, &["--chunk-size", "3"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        vec![
            json!({"id": 1, "name": "a"}),
            json!({"id": 2, "name": null}),
            json!({"id": 3, "name": "a"}),
        ]
    );
}

#[test]
fn packet_mode_skips_non_data_packets() {
    let mut bytes = BytesMut::new();
    bytes.put_varint(1);
    bytes.put_pascal_string("");
    bytes.extend_from_slice(&encoded_rows(vec![vec![Value::UInt32(7), Value::from("z")]]));
    bytes.put_varint(5);

    let output = run(&bytes, &["--packets", "--chunk-size", "1"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output), vec![json!({"id": 7, "name": "z"})]);
}

#[test]
fn text_representation_renders_strings() {
    let bytes = encoded_rows(vec![vec![Value::UInt32(9), Value::from("q")]]);
    let output = run(&bytes, &["--representation", "text"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), vec![json!({"id": "9", "name": "q"})]);
}

#[test]
fn truncated_input_fails() {
    let bytes = encoded_rows(vec![vec![Value::UInt32(1), Value::from("a")]]);
    let output = run(&bytes[..bytes.len() - 1], &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn lz4_flag_reads_framed_blocks() {
    let settings = CodecSettings::default().with_compression(Compression::Lz4);
    let mut bytes = encoded_with(settings.clone(), vec![vec![Value::UInt32(4), Value::from("c")]]);
    bytes.extend_from_slice(&encoded_with(settings, vec![vec![Value::UInt32(5), Value::Null]]));

    let output = run(&bytes, &["--lz4", "--chunk-size", "2"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        vec![json!({"id": 4, "name": "c"}), json!({"id": 5, "name": null})]
    );

    let plain = run(&bytes, &[]);
    assert!(!plain.status.success());
}
