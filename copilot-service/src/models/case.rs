//! Case records as supplied by the frontend.
//!
//! Cases are opaque JSON objects. Only a handful of fields are read, and a
//! missing or oddly typed field is rendered as a placeholder instead of
//! failing the request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder for absent fields in rendered summaries.
pub const MISSING_FIELD: &str = "N/A";

/// One financial-crime case. Field order of the source object is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Case(Map<String, Value>);

impl Case {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// `case_number` as matchable text, if it is a non-empty scalar.
    pub fn case_number(&self) -> Option<String> {
        self.get("case_number").and_then(identifier_text)
    }

    /// `case_id` as matchable text, if it is a non-empty scalar.
    pub fn case_id(&self) -> Option<String> {
        self.get("case_id").and_then(identifier_text)
    }

    /// `risk_assessment.risk_level`, when the nested object carries it.
    pub fn risk_level(&self) -> Option<&Value> {
        self.get("risk_assessment")
            .and_then(Value::as_object)
            .and_then(|risk| risk.get("risk_level"))
            .filter(|v| !v.is_null())
    }

    /// Render a top-level field for a summary line.
    pub fn display_field(&self, key: &str) -> String {
        display_value(self.get(key))
    }

    /// Indented JSON of the whole record.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Map<String, Value>> for Case {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Strings render raw, other scalars as JSON text, containers as compact JSON.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_FIELD.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn identifier_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}
