//! Broadcast-channel announcements for new content.

mod announcer;
mod models;

pub use announcer::{build_announcement, ContentAnnouncer, WATCH_BUTTON_TEXT};
pub use models::{AnnounceOutcome, Announcement, SkipReason};
