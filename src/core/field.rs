//! Field value types exposed to text search

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::resource::RecordId;

/// A polymorphic field value as the backend sends it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value for text search; null is the empty string
    pub fn to_search_text(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Null => String::new(),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            Value::Bool(b) => FieldValue::Boolean(*b),
            // Nested objects and arrays are not searchable
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Null,
        }
    }
}

/// Conversion of typed record fields into [`FieldValue`]
///
/// Used by [`impl_resource!`](crate::impl_resource) to expose struct fields by name.
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue;
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl AsFieldValue for i64 {
    fn as_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl AsFieldValue for FieldValue {
    fn as_field_value(&self) -> FieldValue {
        self.clone()
    }
}

impl AsFieldValue for RecordId {
    fn as_field_value(&self) -> FieldValue {
        match self {
            RecordId::Integer(i) => FieldValue::Integer(*i),
            RecordId::Text(s) => FieldValue::String(s.clone()),
        }
    }
}

impl AsFieldValue for DateTime<Utc> {
    fn as_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue {
        self.as_ref()
            .map(AsFieldValue::as_field_value)
            .unwrap_or(FieldValue::Null)
    }
}
