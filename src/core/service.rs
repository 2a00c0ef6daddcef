//! Service trait for the remote collaborator

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::{Result, StoreError};
use crate::core::resource::{RecordId, Resource};

/// A JSON object of field name to value, as sent to the backend
pub type Fields = Map<String, Value>;

/// Service trait for one remote collection
///
/// Implementations own the round trip to the backend. The store built on top
/// never patches its cache from these return values; it re-lists instead.
#[async_trait]
pub trait ResourceService<T: Resource>: Send + Sync {
    /// List the full collection
    async fn list(&self) -> Result<Vec<T>>;

    /// Create a record; the backend assigns the identifier
    ///
    /// `None` when the backend answered without a body.
    async fn create(&self, fields: Fields) -> Result<Option<T>>;

    /// Update a record with a partial set of fields
    async fn update(&self, id: &RecordId, fields: Fields) -> Result<Option<T>>;

    /// Delete a record
    async fn delete(&self, id: &RecordId) -> Result<()>;
}

/// Serialize a value into [`Fields`], dropping the `id` key and null values
///
/// # Example
/// ```
/// use choir::core::service::fields_of;
/// use serde_json::json;
///
/// let fields = fields_of(&json!({"id": 3, "title": "Nhập Lễ", "author": null})).unwrap();
/// assert_eq!(fields.len(), 1);
/// assert_eq!(fields["title"], "Nhập Lễ");
/// ```
pub fn fields_of<S: Serialize>(value: &S) -> Result<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(mut map)) => {
            map.remove("id");
            map.retain(|_, v| !v.is_null());
            Ok(map)
        }
        Ok(other) => Err(StoreError::InvalidInput(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::InvalidInput(e.to_string())),
    }
}
