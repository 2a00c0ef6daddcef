//! Songs and the song picker used by event programs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::field::FieldValue;
use crate::core::resource::{FilterSpec, RecordId, Resource, ResourceKind};
use crate::impl_resource;

/// A song in the choir's repertoire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub author: Option<String>,
    /// Opening line of the lyrics
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub first_line: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub songbook: Option<String>,
    /// Page in the songbook; some books number pages like `124a`
    #[serde(default, deserialize_with = "crate::core::lenient::opt_scalar")]
    pub songbook_page: Option<FieldValue>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub sheet_music_url: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub audio_url: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub youtube_url: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub lyrics: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(Song, ResourceKind::Song, {
    "title" => title,
    "author" => author,
    "first_line" => first_line,
    "songbook" => songbook,
    "songbook_page" => songbook_page,
    "sheet_music_url" => sheet_music_url,
    "audio_url" => audio_url,
    "youtube_url" => youtube_url,
    "lyrics" => lyrics,
});

impl Song {
    /// Fields searched when picking a song for a program slot
    pub fn picker_filter_spec() -> FilterSpec {
        FilterSpec::new(["title", "songbook", "songbook_page"])
    }

    /// Whether the song can be offered in the picker (it has an id and a title)
    pub fn is_pickable(&self) -> bool {
        self.id.is_some() && !self.title.trim().is_empty()
    }
}

/// Songs matching `input` on title, songbook or page, skipping songs
/// without an id or title
pub fn pick_songs<'a>(songs: &'a [Song], input: &str) -> Vec<&'a Song> {
    Song::picker_filter_spec()
        .filter(songs, input)
        .into_iter()
        .filter(|song| song.is_pickable())
        .collect()
}
