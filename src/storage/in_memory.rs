//! In-memory implementation of ResourceService for testing and development

use crate::core::error::{Result, StoreError};
use crate::core::resource::{RecordId, Resource};
use crate::core::service::{Fields, ResourceService};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory collaborator behaving like the admin backend
///
/// Assigns increasing integer ids on create, merges partial updates, and
/// rejects updates and deletes of unknown ids with a 404 rejection. Uses
/// RwLock for thread-safe access; clones share the same records.
#[derive(Clone)]
pub struct InMemoryResourceService<T: Resource> {
    records: Arc<RwLock<Vec<T>>>,
    next_id: Arc<AtomicI64>,
}

impl<T: Resource> InMemoryResourceService<T> {
    /// Create an empty in-memory service
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a service seeded with `records`
    ///
    /// New ids continue after the largest integer id present.
    pub fn with_records(records: Vec<T>) -> Self {
        let max_id = records
            .iter()
            .filter_map(|r| match r.id() {
                Some(RecordId::Integer(i)) => Some(*i),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        Self {
            records: Arc::new(RwLock::new(records)),
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> StoreError {
        StoreError::Transport(format!("Failed to acquire lock: {}", e))
    }

    fn not_found(id: &RecordId) -> StoreError {
        StoreError::RemoteRejection {
            status: Some(404),
            message: format!("{} {} not found", T::kind().singular(), id),
        }
    }

    fn build(object: Fields) -> Result<T> {
        serde_json::from_value(Value::Object(object))
            .map_err(|e| StoreError::InvalidInput(e.to_string()))
    }
}

impl<T: Resource> Default for InMemoryResourceService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for InMemoryResourceService<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let records = self.records.read().map_err(Self::lock_error)?;
        Ok(records.clone())
    }

    async fn create(&self, mut fields: Fields) -> Result<Option<T>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        fields.insert("id".into(), Value::from(id));
        let record = Self::build(fields)?;

        let mut records = self.records.write().map_err(Self::lock_error)?;
        records.push(record.clone());

        Ok(Some(record))
    }

    async fn update(&self, id: &RecordId, mut fields: Fields) -> Result<Option<T>> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        let existing = records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| Self::not_found(id))?;

        let mut merged = match serde_json::to_value(&*existing) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => Fields::new(),
        };
        fields.remove("id");
        merged.extend(fields);
        merged.insert("id".into(), id.to_json());

        let updated = Self::build(merged)?;
        *existing = updated.clone();

        Ok(Some(updated))
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let mut records = self.records.write().map_err(Self::lock_error)?;

        let before = records.len();
        records.retain(|r| r.id() != Some(id));
        if records.len() == before {
            return Err(Self::not_found(id));
        }

        Ok(())
    }
}
