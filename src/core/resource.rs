//! Resource traits defining the record abstraction shared by every store
//!
//! Each resource kind the admin manages (songs, events, news, ...) is a
//! typed record implementing [`Resource`]. The trait exposes what a generic
//! [`ResourceStore`](crate::core::store::ResourceStore) needs: the record's
//! identifier, its kind, and name-based field lookup for text search.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::field::FieldValue;
use crate::core::normalize::normalize_str;

/// Stable identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Integer(i64),
    Text(String),
}

impl RecordId {
    /// Read an identifier from a JSON value (number or non-empty string)
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Integer),
            Value::String(s) if !s.is_empty() => Some(RecordId::Text(s.clone())),
            _ => None,
        }
    }

    /// The identifier as a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            RecordId::Integer(i) => Value::from(*i),
            RecordId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Integer(i) => write!(f, "{}", i),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Integer(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

/// The closed set of resource kinds managed by the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Song,
    Event,
    NewsItem,
    CommitteeMember,
    Document,
    Album,
    Photo,
}

impl ResourceKind {
    /// All kinds, in menu order
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Song,
        ResourceKind::Event,
        ResourceKind::NewsItem,
        ResourceKind::CommitteeMember,
        ResourceKind::Document,
        ResourceKind::Album,
        ResourceKind::Photo,
    ];

    /// Path segment of the collection endpoint (e.g. `songs`)
    ///
    /// Photos are listed per album; see
    /// [`ResourcePath::album_photos`](crate::storage::rest::ResourcePath::album_photos).
    pub fn collection_name(&self) -> &'static str {
        match self {
            ResourceKind::Song => "songs",
            ResourceKind::Event => "events",
            ResourceKind::NewsItem => "news",
            ResourceKind::CommitteeMember => "committee",
            ResourceKind::Document => "documents",
            ResourceKind::Album => "albums",
            ResourceKind::Photo => "photos",
        }
    }

    /// Singular human-readable name, used in log lines and messages
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Song => "song",
            ResourceKind::Event => "event",
            ResourceKind::NewsItem => "news item",
            ResourceKind::CommitteeMember => "committee member",
            ResourceKind::Document => "document",
            ResourceKind::Album => "album",
            ResourceKind::Photo => "photo",
        }
    }

    /// Fields searched by default for this kind
    pub fn default_search_fields(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Song => &["title", "author", "songbook", "first_line", "songbook_page"],
            ResourceKind::Event => &["title", "type", "location"],
            ResourceKind::NewsItem => &["title", "author", "content"],
            ResourceKind::CommitteeMember => &["name", "position"],
            ResourceKind::Document => &["title", "category", "uploader"],
            ResourceKind::Album => &["title"],
            ResourceKind::Photo => &["caption"],
        }
    }

    /// Default [`FilterSpec`] for this kind
    pub fn default_filter_spec(&self) -> FilterSpec {
        FilterSpec::new(self.default_search_fields().iter().copied())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_name())
    }
}

/// Ordered set of field names that participate in text search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FilterSpec {
    fields: Vec<String>,
}

impl FilterSpec {
    /// Build a spec; duplicates are dropped, first occurrence wins
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self { fields: unique }
    }

    /// Field names in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any configured field of `record` contains the already
    /// normalized `needle`
    ///
    /// An empty needle matches every record. Missing fields read as `""`.
    pub fn matches<T: Resource>(&self, record: &T, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.fields
            .iter()
            .any(|field| normalize_str(&record.search_text(field)).contains(needle))
    }

    /// Filter `records` by an unnormalized query, preserving order
    pub fn filter<'a, T: Resource>(&self, records: &'a [T], query: &str) -> Vec<&'a T> {
        let needle = normalize_str(query);
        records
            .iter()
            .filter(|record| self.matches(*record, &needle))
            .collect()
    }
}

impl From<Vec<String>> for FilterSpec {
    fn from(fields: Vec<String>) -> Self {
        FilterSpec::new(fields)
    }
}

impl From<FilterSpec> for Vec<String> {
    fn from(spec: FilterSpec) -> Self {
        spec.fields
    }
}

/// Trait implemented by every record type a store can hold
///
/// Use [`impl_resource!`](crate::impl_resource) rather than implementing it by hand.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The kind of this record
    fn kind() -> ResourceKind;

    /// Backend-assigned identifier, absent before creation
    fn id(&self) -> Option<&RecordId>;

    /// Look up a field by its wire name
    ///
    /// Returns `None` for fields the record does not carry.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Fields searched by default
    fn filter_spec() -> FilterSpec {
        Self::kind().default_filter_spec()
    }

    /// The field rendered for search; missing and null fields are `""`
    fn search_text(&self, field: &str) -> String {
        self.field_value(field)
            .map(|value| value.to_search_text())
            .unwrap_or_default()
    }
}
