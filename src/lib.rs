//! # choir-admin
//!
//! Typed client-side building blocks for administering a choir's content
//! through its REST backend: songs, events and their liturgical programs,
//! news, committee members, documents, photo albums and photos.
//!
//! ## Features
//!
//! - **Accent-insensitive search**: Vietnamese-aware text normalization
//!   (`"Đức Mẹ"` matches `"duc me"`)
//! - **Resource stores**: a cached mirror of one remote collection with
//!   re-fetch-on-write and filtered views
//! - **Typed records**: one struct per resource kind, unknown fields preserved
//! - **Stale-response protection**: only the latest issued load updates a store
//! - **Explicit credentials**: the bearer token is handed to the client, never
//!   read from global state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use choir::prelude::*;
//! use std::sync::Arc;
//!
//! let config = AdminConfig::from_yaml_file("admin.yaml")?.with_env_overrides()?;
//! let anonymous = RestClient::from_config(&config)?;
//! let credential = anonymous.login("admin", "secret").await?;
//! let client = anonymous.with_credential(credential);
//!
//! let songs = ResourceStore::<Song>::with_filter_spec(
//!     Arc::new(client.service::<Song>()),
//!     config.filter_spec_for(ResourceKind::Song),
//! );
//! songs.load().await?;
//! songs.set_query("nhap le");
//! for song in songs.filtered_view() {
//!     println!("{}", song.title);
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::Credential,
        error::{Result, StoreError},
        field::FieldValue,
        normalize::{normalize, normalize_str},
        resource::{FilterSpec, RecordId, Resource, ResourceKind},
        service::{Fields, ResourceService, fields_of},
        store::{LoadOutcome, ResourceStore, StoreStatus},
        upload::{StubUploader, Uploader},
    };

    // === Macros ===
    pub use crate::impl_resource;

    // === Records ===
    pub use crate::entities::{
        Album, CommitteeMember, Document, EVENT_TYPES, Event, EventForm, EventProgram, NewsItem,
        Photo, ProgramPart, ProgramSlot, Song, pick_songs,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryResourceService, ResourcePath, RestClient, RestResourceService};

    // === Config ===
    pub use crate::config::AdminConfig;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
