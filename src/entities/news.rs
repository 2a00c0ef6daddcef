//! News items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::resource::{RecordId, ResourceKind};
use crate::impl_resource;

/// A news post on the choir's site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub content: Option<String>,
    /// Assigned by the backend
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(NewsItem, ResourceKind::NewsItem, {
    "title" => title,
    "author" => author,
    "content" => content,
    "createdAt" => created_at,
});
