//! Shared test harness for collaborator and store testing
//!
//! Provides a mock admin backend served over real HTTP, a gated service for
//! driving response order by hand, and helpers for building test records.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

pub mod mock_backend;

pub use mock_backend::{MockBackend, RecordedRequest};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

use choir::core::error::{Result, StoreError};
use choir::core::resource::{RecordId, Resource};
use choir::core::service::{Fields, ResourceService};
use choir::entities::Song;

// ---------------------------------------------------------------------------
// Record helpers
// ---------------------------------------------------------------------------

pub fn song(id: i64, title: &str) -> Song {
    Song {
        id: Some(RecordId::Integer(id)),
        title: title.to_string(),
        ..Default::default()
    }
}

pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn ids<T: Resource>(records: &[T]) -> Vec<RecordId> {
    records.iter().filter_map(|r| r.id().cloned()).collect()
}

// ---------------------------------------------------------------------------
// GatedService — list() responses released by the test, in any order
// ---------------------------------------------------------------------------

/// A service whose `list` calls each wait on a gate the test opens by hand
///
/// Call `open(n, response)` to release the n-th `list` call (0-based).
/// Mutations succeed immediately and are recorded.
pub struct GatedService<T> {
    senders: Mutex<Vec<Option<oneshot::Sender<Result<Vec<T>>>>>>,
    receivers: Mutex<VecDeque<oneshot::Receiver<Result<Vec<T>>>>>,
    calls: AtomicUsize,
    pub deleted: Mutex<Vec<RecordId>>,
}

impl<T: Resource> GatedService<T> {
    /// Prepare `gates` list calls
    pub fn new(gates: usize) -> Self {
        let mut senders = Vec::with_capacity(gates);
        let mut receivers = VecDeque::with_capacity(gates);
        for _ in 0..gates {
            let (tx, rx) = oneshot::channel();
            senders.push(Some(tx));
            receivers.push_back(rx);
        }
        Self {
            senders: Mutex::new(senders),
            receivers: Mutex::new(receivers),
            calls: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Number of `list` calls started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Release the n-th `list` call with `response`
    pub fn open(&self, n: usize, response: Result<Vec<T>>) {
        let sender = self.senders.lock().unwrap()[n].take().expect("gate already opened");
        let _ = sender.send(response);
    }

    /// Wait until at least `n` list calls have started
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for GatedService<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let receiver = self
            .receivers
            .lock()
            .unwrap()
            .pop_front()
            .expect("no gate left for list()");
        self.calls.fetch_add(1, Ordering::SeqCst);
        receiver
            .await
            .unwrap_or_else(|_| Err(StoreError::Transport("gate dropped".into())))
    }

    async fn create(&self, _fields: Fields) -> Result<Option<T>> {
        Ok(None)
    }

    async fn update(&self, _id: &RecordId, _fields: Fields) -> Result<Option<T>> {
        Ok(None)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.deleted.lock().unwrap().push(id.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailingService — every call fails with a fixed error
// ---------------------------------------------------------------------------

pub struct FailingService {
    pub error: StoreError,
}

#[async_trait]
impl ResourceService<Song> for FailingService {
    async fn list(&self) -> Result<Vec<Song>> {
        Err(self.error.clone())
    }

    async fn create(&self, _fields: Fields) -> Result<Option<Song>> {
        Err(self.error.clone())
    }

    async fn update(&self, _id: &RecordId, _fields: Fields) -> Result<Option<Song>> {
        Err(self.error.clone())
    }

    async fn delete(&self, _id: &RecordId) -> Result<()> {
        Err(self.error.clone())
    }
}
