//! Record types for every resource kind the admin manages

pub mod committee;
pub mod document;
pub mod event;
pub mod gallery;
pub mod macros;
pub mod news;
pub mod song;

pub use committee::CommitteeMember;
pub use document::Document;
pub use event::{EVENT_TYPES, Event, EventForm, EventProgram, ProgramPart, ProgramSlot};
pub use gallery::{Album, Photo};
pub use news::NewsItem;
pub use song::{Song, pick_songs};
