//! Collaborator implementations for different backends

pub mod in_memory;
pub mod rest;

pub use in_memory::InMemoryResourceService;
pub use rest::{ResourcePath, RestClient, RestResourceService};
