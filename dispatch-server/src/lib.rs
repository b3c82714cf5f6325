//! Cinedrop Dispatch Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod content_store;
pub mod deep_link;
pub mod delivery;
pub mod ingestion;
pub mod metadata;
pub mod notifications;
pub mod release_parser;
pub mod server;
pub mod sqlite_persistence;
pub mod telegram;

// Re-export commonly used types for convenience
pub use content_store::{ContentStore, SqliteContentStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerState};
