//! Core module containing the record model, text normalization and the
//! generic resource store

pub mod auth;
pub mod error;
pub mod field;
pub mod lenient;
pub mod normalize;
pub mod resource;
pub mod service;
pub mod store;
pub mod upload;

pub use auth::Credential;
pub use error::{Result, StoreError};
pub use field::{AsFieldValue, FieldValue};
pub use normalize::{normalize, normalize_str};
pub use resource::{FilterSpec, RecordId, Resource, ResourceKind};
pub use service::{Fields, ResourceService, fields_of};
pub use store::{LoadOutcome, ResourceStore, StoreStatus};
pub use upload::{StubUploader, Uploader};
