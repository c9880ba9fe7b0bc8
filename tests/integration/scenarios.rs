use std::fs;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::integration::matcher::Matcher;

#[derive(Debug, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub spec: String,
}

/// One insert-then-select case: rows are encoded into a block, decoded
/// back at several fragmentations and rendered as JSON lines.
#[derive(Debug, Deserialize)]
pub struct TestScenario {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<JsonValue>>,
    #[serde(default)]
    pub revision: Option<u64>,
    /// native, text, number or bytes
    #[serde(default)]
    pub representation: Option<String>,
    /// Expected encoding of the first column's data, in hex.
    #[serde(default)]
    pub data_hex: Option<String>,
    pub matchers: Vec<Matcher>,
}

pub fn load_scenarios_from_json(path: &str) -> Vec<TestScenario> {
    let content = fs::read_to_string(path).expect("Failed to read scenario file");
    serde_json::from_str(&content).expect("Invalid JSON format")
}
