//! Rebuttal payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category reported when neither the completion nor the caller supplied one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Field names shared by the prompt schema, the candidate and the result
pub mod fields {
    pub const ACKNOWLEDGE: &str = "acknowledge";
    pub const DIFFERENTIATE: &str = "differentiate";
    pub const ANCHOR: &str = "anchor";
    pub const CLOSE: &str = "close";
    pub const SCRIPT: &str = "script";
    pub const CATEGORY: &str = "category";

    /// All six result fields in wire order
    pub const ALL: [&str; 6] = [ACKNOWLEDGE, DIFFERENTIATE, ANCHOR, CLOSE, SCRIPT, CATEGORY];
}

/// ADA+C rebuttal returned to the caller
///
/// Every field is present and trimmed. `category` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebuttalResult {
    pub acknowledge: String,
    pub differentiate: String,
    pub anchor: String,
    pub close: String,
    pub script: String,
    pub category: String,
}

/// Untrusted structured output
///
/// Whatever object the completion service produced (or the fallback
/// generator built). Field access never assumes a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RebuttalCandidate(Map<String, Value>);

impl RebuttalCandidate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Set a field (builder pattern)
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// The raw value of a field, whatever its type
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The field's text if it is a string
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RebuttalCandidate {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<RebuttalResult> for RebuttalCandidate {
    fn from(result: RebuttalResult) -> Self {
        RebuttalCandidate::new()
            .with(fields::ACKNOWLEDGE, result.acknowledge)
            .with(fields::DIFFERENTIATE, result.differentiate)
            .with(fields::ANCHOR, result.anchor)
            .with(fields::CLOSE, result.close)
            .with(fields::SCRIPT, result.script)
            .with(fields::CATEGORY, result.category)
    }
}
