//! Events and their liturgical program
//!
//! A liturgy has seven named song slots. The backend reads them as flat
//! fields (`nhapLe_song`, `nhapLe_note`, ...) and returns the chosen song
//! resolved as an object (`nhapLeSong: { id, title, ... }`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::core::error::{Result, StoreError};
use crate::core::resource::{RecordId, ResourceKind};
use crate::core::service::Fields;
use crate::impl_resource;

/// Event types offered by the admin form
pub const EVENT_TYPES: [&str; 4] = ["Lễ", "Hôn Lễ", "Họp/Tập hát", "Khác"];

/// A mass, wedding, rehearsal or other gathering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(deserialize_with = "crate::core::lenient::opt_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "crate::core::lenient::string")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "crate::core::lenient::opt_string")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_datetime")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::core::lenient::opt_string")]
    pub location: Option<String>,
    /// Program slots and anything else the backend sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl_resource!(Event, ResourceKind::Event, {
    "title" => title,
    "type" => event_type,
    "date" => date,
    "location" => location,
});

impl Event {
    /// The program carried by this event
    pub fn program(&self) -> EventProgram {
        EventProgram::from_event(self)
    }
}

/// One of the seven song slots of a liturgy, in celebration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProgramPart {
    /// Entrance
    NhapLe,
    /// Responsorial psalm
    DapCa,
    Alleluia,
    /// Offertory
    DangLe,
    /// Communion
    HiepLe,
    /// Recessional
    KetLe,
    /// Marian hymn or other
    DucMe,
}

impl ProgramPart {
    pub const ALL: [ProgramPart; 7] = [
        ProgramPart::NhapLe,
        ProgramPart::DapCa,
        ProgramPart::Alleluia,
        ProgramPart::DangLe,
        ProgramPart::HiepLe,
        ProgramPart::KetLe,
        ProgramPart::DucMe,
    ];

    /// Wire key prefix
    pub fn key(&self) -> &'static str {
        match self {
            ProgramPart::NhapLe => "nhapLe",
            ProgramPart::DapCa => "dapCa",
            ProgramPart::Alleluia => "alleluia",
            ProgramPart::DangLe => "dangLe",
            ProgramPart::HiepLe => "hiepLe",
            ProgramPart::KetLe => "ketLe",
            ProgramPart::DucMe => "ducMe",
        }
    }

    /// Label shown to the admin
    pub fn label(&self) -> &'static str {
        match self {
            ProgramPart::NhapLe => "Nhập Lễ",
            ProgramPart::DapCa => "Đáp Ca",
            ProgramPart::Alleluia => "Alleluia",
            ProgramPart::DangLe => "Dâng Lễ",
            ProgramPart::HiepLe => "Hiệp Lễ",
            ProgramPart::KetLe => "Kết Lễ",
            ProgramPart::DucMe => "Dâng Mẹ / Khác",
        }
    }

    /// Request field holding the chosen song id (`nhapLe_song`)
    pub fn song_field(&self) -> String {
        format!("{}_song", self.key())
    }

    /// Field holding the note, same in requests and responses (`nhapLe_note`)
    pub fn note_field(&self) -> String {
        format!("{}_note", self.key())
    }

    /// Response field holding the resolved song object (`nhapLeSong`)
    pub fn resolved_song_field(&self) -> String {
        format!("{}Song", self.key())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|part| part.key() == key)
    }
}

/// Song and note chosen for one slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSlot {
    pub song_id: Option<RecordId>,
    /// Who sings, or any other remark
    pub note: Option<String>,
}

impl ProgramSlot {
    pub fn is_empty(&self) -> bool {
        self.song_id.is_none() && self.note.as_deref().is_none_or(|n| n.trim().is_empty())
    }
}

/// The liturgical program of an event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventProgram {
    slots: BTreeMap<ProgramPart, ProgramSlot>,
}

impl EventProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the program from an event as the backend returns it
    ///
    /// The resolved `{part}Song.id` wins; a flat `{part}_song` is accepted
    /// for backends that echo the request shape.
    pub fn from_event(event: &Event) -> Self {
        let mut program = Self::new();
        for part in ProgramPart::ALL {
            let song_id = event
                .extra
                .get(&part.resolved_song_field())
                .and_then(|song| song.get("id"))
                .and_then(RecordId::from_json)
                .or_else(|| {
                    event
                        .extra
                        .get(&part.song_field())
                        .and_then(RecordId::from_json)
                });
            let note = event
                .extra
                .get(&part.note_field())
                .and_then(Value::as_str)
                .filter(|n| !n.trim().is_empty())
                .map(str::to_string);
            let slot = ProgramSlot { song_id, note };
            if !slot.is_empty() {
                program.slots.insert(part, slot);
            }
        }
        program
    }

    pub fn set_song(&mut self, part: ProgramPart, song_id: impl Into<RecordId>) {
        self.slots.entry(part).or_default().song_id = Some(song_id.into());
    }

    pub fn set_note(&mut self, part: ProgramPart, note: impl Into<String>) {
        self.slots.entry(part).or_default().note = Some(note.into());
    }

    pub fn clear(&mut self, part: ProgramPart) {
        self.slots.remove(&part);
    }

    pub fn slot(&self, part: ProgramPart) -> Option<&ProgramSlot> {
        self.slots.get(&part)
    }

    /// Filled slots in celebration order
    pub fn iter(&self) -> impl Iterator<Item = (ProgramPart, &ProgramSlot)> {
        self.slots.iter().map(|(part, slot)| (*part, slot))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(ProgramSlot::is_empty)
    }

    /// Write the program in request shape; empty slots are omitted
    ///
    /// Song ids are sent as strings.
    pub fn apply_to(&self, fields: &mut Fields) {
        for (part, slot) in self.iter() {
            if let Some(song_id) = &slot.song_id {
                fields.insert(part.song_field(), Value::String(song_id.to_string()));
            }
            if let Some(note) = slot.note.as_deref().filter(|n| !n.trim().is_empty()) {
                fields.insert(part.note_field(), Value::String(note.to_string()));
            }
        }
    }
}

/// The event editing form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub event_type: String,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub program: EventProgram,
}

impl EventForm {
    /// Prefill the form from an existing event
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            event_type: event.event_type.clone().unwrap_or_default(),
            location: event.location.clone(),
            date: event.date,
            program: event.program(),
        }
    }

    /// Build the create/update payload
    ///
    /// Title and type are required. The date is sent as ISO 8601 with
    /// milliseconds, or `null`.
    pub fn into_fields(self) -> Result<Fields> {
        if self.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("event title is required".into()));
        }
        if self.event_type.trim().is_empty() {
            return Err(StoreError::InvalidInput("event type is required".into()));
        }

        let mut fields = Fields::new();
        fields.insert("title".into(), Value::String(self.title));
        fields.insert("type".into(), Value::String(self.event_type));
        if let Some(location) = self.location.filter(|l| !l.trim().is_empty()) {
            fields.insert("location".into(), Value::String(location));
        }
        fields.insert(
            "date".into(),
            self.date
                .map(|d| Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)))
                .unwrap_or(Value::Null),
        );
        self.program.apply_to(&mut fields);
        Ok(fields)
    }
}
