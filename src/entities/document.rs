//! Shared documents (sheet music collections, schedules, minutes)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::resource::{RecordId, ResourceKind};
use crate::impl_resource;

/// A downloadable document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub category: Option<String>,
    #[serde(rename = "uploadDate", default, deserialize_with = "crate::core::lenient::opt_string")]
    pub upload_date: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub uploader: Option<String>,
    /// Where the file is served from, as returned by an
    /// [`Uploader`](crate::core::upload::Uploader)
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(Document, ResourceKind::Document, {
    "title" => title,
    "category" => category,
    "uploadDate" => upload_date,
    "uploader" => uploader,
    "url" => url,
});
