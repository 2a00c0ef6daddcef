//! Photo albums and their photos

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::resource::{RecordId, ResourceKind};
use crate::impl_resource;

/// A photo album, optionally tied to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub date: Option<String>,
    #[serde(rename = "eventId", default, deserialize_with = "crate::core::lenient::opt_record_id")]
    pub event_id: Option<RecordId>,
    #[serde(rename = "coverImage", default, deserialize_with = "crate::core::lenient::opt_string")]
    pub cover_image: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(Album, ResourceKind::Album, {
    "title" => title,
    "date" => date,
    "eventId" => event_id,
    "coverImage" => cover_image,
});

/// A photo inside an album
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(rename = "albumId", default, deserialize_with = "crate::core::lenient::opt_record_id")]
    pub album_id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub caption: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(Photo, ResourceKind::Photo, {
    "albumId" => album_id,
    "url" => url,
    "caption" => caption,
});
