//! Client-side mirror of one remote collection
//!
//! A [`ResourceStore`] caches the last successfully listed collection, passes
//! mutations through to its [`ResourceService`], and re-lists after every
//! successful mutation instead of patching its cache. The backend may enrich
//! records (identifiers, timestamps, resolved relations), so only a fresh
//! listing is trusted.
//!
//! Every [`load`](ResourceStore::load) takes a request token from a
//! monotonically increasing counter. A response is applied only if its token
//! is still the latest issued one; older responses are discarded, so the
//! visible collection always belongs to the last-issued load.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = ResourceStore::<Song>::new(Arc::new(client.service::<Song>()));
//! store.load().await?;
//! store.set_query("nhap le");
//! for song in store.filtered_view() {
//!     println!("{}", song.title);
//! }
//! ```

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::core::error::{Result, StoreError};
use crate::core::normalize::normalize_str;
use crate::core::resource::{FilterSpec, RecordId, Resource};
use crate::core::service::{Fields, ResourceService};

/// Whether any round trip is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Idle,
    Loading,
}

/// What a [`ResourceStore::load`] call did with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the cached collection
    Applied { count: usize },
    /// A newer load was issued before this one completed; the response was dropped
    Superseded { token: u64 },
}

struct StoreState<T> {
    records: Vec<T>,
    query: String,
    last_error: Option<StoreError>,
}

/// Decrements the in-flight counter when the round trip ends, even if the
/// future is dropped mid-flight.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Generic client-side cache of one remote collection
pub struct ResourceStore<T: Resource> {
    service: Arc<dyn ResourceService<T>>,
    filter_spec: FilterSpec,
    state: RwLock<StoreState<T>>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl<T: Resource> ResourceStore<T> {
    /// Create an empty store searching the kind's default fields
    pub fn new(service: Arc<dyn ResourceService<T>>) -> Self {
        Self::with_filter_spec(service, T::filter_spec())
    }

    /// Create an empty store searching `filter_spec`
    pub fn with_filter_spec(service: Arc<dyn ResourceService<T>>, filter_spec: FilterSpec) -> Self {
        Self {
            service,
            filter_spec,
            state: RwLock::new(StoreState {
                records: Vec::new(),
                query: String::new(),
                last_error: None,
            }),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    // The state is only ever replaced wholesale, so a poisoned lock still
    // holds a consistent value.
    fn read_state(&self) -> RwLockReadGuard<'_, StoreState<T>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState<T>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the full collection and replace the cache on success
    ///
    /// On failure the cached collection is left untouched, the error is
    /// recorded as [`last_error`](Self::last_error) and returned.
    pub async fn load(&self) -> Result<LoadOutcome> {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight::enter(&self.in_flight);
        let resource = T::kind().collection_name();
        debug!(resource, token, "Loading collection");

        let result = self.service.list().await;

        let latest = self.issued.load(Ordering::SeqCst);
        if token != latest {
            debug!(resource, token, latest, "Discarding superseded response");
            return result.map(|_| LoadOutcome::Superseded { token });
        }

        match result {
            Ok(records) => {
                let count = records.len();
                let mut state = self.write_state();
                state.records = records;
                state.last_error = None;
                info!(resource, count, token, "Collection loaded");
                Ok(LoadOutcome::Applied { count })
            }
            Err(err) => {
                warn!(resource, token, error = %err, "Failed to load collection");
                self.write_state().last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Create a record, then re-list on success
    ///
    /// Returns the record as the backend echoed it. A failed resync does not
    /// fail the creation; it is recorded in [`last_error`](Self::last_error).
    pub async fn create(&self, fields: Fields) -> Result<Option<T>> {
        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            self.service.create(fields).await
        };
        self.after_mutation("create", result).await
    }

    /// Update a record with a partial set of fields, then re-list on success
    pub async fn update(&self, id: &RecordId, fields: Fields) -> Result<Option<T>> {
        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            self.service.update(id, fields).await
        };
        self.after_mutation("update", result).await
    }

    /// Delete a record, then re-list on success
    ///
    /// The id is forwarded even when it is not in the cached collection.
    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            self.service.delete(id).await
        };
        self.after_mutation("delete", result).await
    }

    async fn after_mutation<R>(&self, operation: &'static str, result: Result<R>) -> Result<R> {
        let resource = T::kind().collection_name();
        match result {
            Ok(value) => {
                debug!(resource, operation, "Mutation succeeded, resynchronizing");
                if let Err(err) = self.load().await {
                    warn!(resource, operation, error = %err, "Resync after mutation failed");
                }
                Ok(value)
            }
            Err(err) => {
                warn!(resource, operation, error = %err, "Mutation failed");
                self.write_state().last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Store the current search query
    pub fn set_query(&self, text: impl Into<String>) {
        self.write_state().query = text.into();
    }

    /// The current search query, unnormalized
    pub fn query(&self) -> String {
        self.read_state().query.clone()
    }

    /// Records matching the current query on any field of the filter spec
    ///
    /// Relative order is preserved. An empty query returns every record.
    pub fn filtered_view(&self) -> Vec<T> {
        let state = self.read_state();
        let needle = normalize_str(&state.query);
        state
            .records
            .iter()
            .filter(|record| self.filter_spec.matches(*record, &needle))
            .cloned()
            .collect()
    }

    /// Snapshot of the cached collection
    pub fn records(&self) -> Vec<T> {
        self.read_state().records.clone()
    }

    /// Look up a cached record by identifier
    pub fn find(&self, id: &RecordId) -> Option<T> {
        self.read_state()
            .records
            .iter()
            .find(|record| record.id() == Some(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read_state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().records.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn status(&self) -> StoreStatus {
        if self.is_loading() {
            StoreStatus::Loading
        } else {
            StoreStatus::Idle
        }
    }

    /// The most recent failure, cleared by the next applied load
    pub fn last_error(&self) -> Option<StoreError> {
        self.read_state().last_error.clone()
    }

    pub fn clear_error(&self) {
        self.write_state().last_error = None;
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        &self.filter_spec
    }
}
