//! Mapping helpers turning raw partition elements into documents.

use crate::partition::types::Document;
use serde_json::{Map, Value};

/// Key added to every document's attributes, holding the element `type`.
pub const CATEGORY_KEY: &str = "category";

/// Convert the decoded response array into documents, preserving element order.
///
/// Elements without a string `text` field carry nothing to propagate and are skipped.
pub(crate) fn map_elements(elements: Vec<Value>) -> Vec<Document> {
    elements.into_iter().filter_map(map_element).collect()
}

fn map_element(element: Value) -> Option<Document> {
    let Value::Object(mut fields) = element else {
        return None;
    };
    let Some(Value::String(content)) = fields.remove("text") else {
        return None;
    };

    let mut attributes = match fields.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        _ => Map::new(),
    };
    // Synthesized keys win over copied metadata.
    let category = fields.remove("type").unwrap_or(Value::Null);
    attributes.insert(CATEGORY_KEY.to_string(), category);

    Some(Document {
        content,
        attributes,
    })
}

/// Final path segment of `name`, used as the display file name on the wire.
pub(crate) fn display_file_name(name: &str) -> &str {
    name.rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(name)
}

/// Short human-readable description of a JSON value's shape.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => format!("boolean {flag}"),
        Value::Number(number) => format!("number {number}"),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(8).collect();
            format!("an object with keys [{}]", keys.join(", "))
        }
    }
}
