//! Tolerant deserializers for record fields
//!
//! A record field may arrive as a string, a number or `null`, whatever the
//! struct declares. One odd value must not fail a whole listing, so record
//! fields are read through these helpers instead of their strict impls.
//!
//! ```rust,ignore
//! #[serde(default, deserialize_with = "crate::core::lenient::string")]
//! pub title: String,
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::field::FieldValue;
use crate::core::resource::RecordId;

/// Text form of a scalar; `None` for null, objects and arrays
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Required text: `null` reads as `""`, numbers as their decimal form
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional text: `null` and non-scalars read as `None`
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Optional scalar kept in its wire type
pub fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = FieldValue::from(&Value::deserialize(deserializer)?);
    Ok((!value.is_null()).then_some(value))
}

/// Optional identifier: a number or a non-empty string, else `None`
pub fn opt_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RecordId::from_json(&Value::deserialize(deserializer)?))
}

/// Optional timestamp; unparseable values read as `None`
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => parse_datetime(&text),
        _ => None,
    })
}

/// Parse RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC),
/// or a bare `YYYY-MM-DD` (midnight UTC)
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
