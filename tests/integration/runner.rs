use bytes::BytesMut;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use ch_native::codec::block::{BlockReader, BlockWriter};
use ch_native::codec::column::{ColumnDescriptor, Representation, TypeRegistry};
use ch_native::codec::errors::CodecError;
use ch_native::codec::settings::CodecSettings;
use ch_native::codec::types::Value;

use crate::integration::scenarios::TestScenario;

const CHUNK_SIZES: [usize; 4] = [1, 2, 3, 7];

/// Plain JSON to codec values; the column writer does the type coercion.
pub fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                Value::UInt64(u)
            } else if let Some(i) = n.as_i64() {
                Value::Int64(i)
            } else {
                Value::Float64(n.as_f64().unwrap_or_default())
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(json_to_value).collect()),
        JsonValue::Object(_) => panic!("objects are not column values"),
    }
}

fn representation(name: Option<&str>) -> Representation {
    match name.unwrap_or("native") {
        "native" => Representation::Native,
        "text" => Representation::Text,
        "number" => Representation::Number,
        "bytes" => Representation::Bytes,
        other => panic!("unknown representation '{other}'"),
    }
}

fn render(registry: &TypeRegistry, bytes: &[u8], repr: Representation) -> Result<String, CodecError> {
    let mut reference = None;
    for chunk in CHUNK_SIZES.into_iter().chain([bytes.len().max(1)]) {
        let mut reader = BlockReader::new(registry.clone());
        let mut buffer = BytesMut::new();
        let mut decoded = None;
        for piece in bytes.chunks(chunk) {
            buffer.extend_from_slice(piece);
            if let Some(block) = reader.read(&mut buffer)? {
                decoded = Some(block);
            }
        }
        if bytes.is_empty() {
            decoded = reader.read(&mut buffer)?;
        }
        let block = decoded.expect("block completes on the last byte");
        assert!(buffer.is_empty(), "{} bytes left after block", buffer.len());
        debug!(chunk, rows = block.rows(), "decoded block");
        match &reference {
            None => reference = Some(block),
            Some(first) => assert_eq!(first, &block, "chunk size {chunk} changed the block"),
        }
    }
    let block = reference.expect("at least one decode");
    let lines = block
        .to_rows(repr)?
        .into_iter()
        .map(|row| JsonValue::Array(row.iter().map(Value::to_json).collect()).to_string())
        .collect::<Vec<_>>();
    Ok(lines.join("\n"))
}

fn encode(
    registry: &TypeRegistry,
    descriptors: Vec<ColumnDescriptor>,
    rows: Vec<Vec<Value>>,
) -> Result<Vec<u8>, CodecError> {
    let writer = BlockWriter::new(registry, descriptors, rows)?;
    let mut out = BytesMut::new();
    writer.serialize_all(&mut out)?;
    Ok(out.to_vec())
}

fn check_data_hex(scenario: &TestScenario, registry: &TypeRegistry, rows: &[Vec<Value>], expected: &str) {
    let column = &scenario.columns[0];
    let descriptor = registry
        .descriptor(&column.name, &column.spec)
        .expect("valid column type");
    let mut out = BytesMut::new();
    registry
        .writer(descriptor.into(), 0)
        .serialize_rows(&mut out, rows, 0, rows.len())
        .expect("column encodes");
    assert_eq!(
        hex::encode(&out),
        expected.replace(' ', ""),
        "scenario '{}' column bytes",
        scenario.name
    );
}

pub fn run_scenario(scenario: &TestScenario) {
    info!("▶ Running scenario: {}", scenario.name);
    let mut settings = CodecSettings::default();
    if let Some(revision) = scenario.revision {
        settings = settings.with_revision(revision);
    }
    let registry = TypeRegistry::new(settings);

    let descriptors = scenario
        .columns
        .iter()
        .map(|c| registry.descriptor(&c.name, &c.spec))
        .collect::<Result<Vec<_>, _>>();
    let rows: Vec<Vec<Value>> = scenario
        .rows
        .iter()
        .map(|row| row.iter().map(json_to_value).collect())
        .collect();

    if let Some(expected) = &scenario.data_hex {
        check_data_hex(scenario, &registry, &rows, expected);
    }

    let repr = representation(scenario.representation.as_deref());
    let output = descriptors
        .and_then(|d| encode(&registry, d, rows))
        .and_then(|bytes| render(&registry, &bytes, repr))
        .unwrap_or_else(|e| format!("error: {e}"));
    debug!("scenario output:\n{}", output);

    for matcher in &scenario.matchers {
        assert!(
            matcher.matches(&output),
            "scenario '{}' failed {:?}\noutput:\n{}",
            scenario.name,
            matcher,
            output
        );
    }
}
