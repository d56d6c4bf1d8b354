use serde_json::Value;
use std::collections::HashMap;

/// Content for one named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Rendered as a single body line.
    Scalar(String),
    /// Rendered as one `- item` line per entry.
    List(Vec<String>),
}

impl FieldValue {
    /// Converts a JSON value, returning `None` for shapes that carry no
    /// renderable content (numbers, booleans, objects, null).
    ///
    /// Non-string list items are kept using their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FieldValue::Scalar(s.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Body lines this value contributes, in order.
    pub fn lines(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::List(items) => items.iter().map(|item| format!("- {}", item)).collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(String::from).collect())
    }
}

/// Field id -> value, as produced by a summarizer or a direct save.
pub type FieldValues = HashMap<String, FieldValue>;

/// Builds a field mapping from a JSON object, dropping fields whose values
/// are not a string or a list.
pub fn field_values_from_json(map: &serde_json::Map<String, Value>) -> FieldValues {
    map.iter()
        .filter_map(|(key, value)| match FieldValue::from_json(value) {
            Some(v) => Some((key.clone(), v)),
            None => {
                tracing::debug!("Ignoring field '{}' with unsupported value {}", key, value);
                None
            }
        })
        .collect()
}
