//! Committee members

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::resource::{RecordId, ResourceKind};
use crate::impl_resource;

/// A member of the choir's governing committee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitteeMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub position: Option<String>,
    /// Avatar image URL
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(CommitteeMember, ResourceKind::CommitteeMember, {
    "name" => name,
    "position" => position,
    "avatar" => avatar,
});
