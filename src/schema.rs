use schemars::schema_for;
use serde_json::Value;

use crate::model::FixtureDescription;

/// JSON Schema for the fixture description the extraction step must produce.
pub fn fixture_schema() -> Value {
    let root = schema_for!(FixtureDescription);
    serde_json::to_value(root).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
}

pub fn fixture_schema_pretty() -> String {
    serde_json::to_string_pretty(&fixture_schema()).unwrap_or_default()
}
