//! ContentStore trait definition.

use super::models::{ContentEntry, NewContentEntry, ReleaseUpdate};
use anyhow::Result;

/// Persistent storage of content entries.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// storage failures.
pub trait ContentStore: Send + Sync {
    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get an entry by its internal id.
    fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>>;

    /// Get the first entry created for an external catalog id.
    fn find_by_external_id(&self, external_id: &str) -> Result<Option<ContentEntry>>;

    /// Get the first shell entry (no external id) whose normalized title equals `title_key`.
    fn find_shell_by_title_key(&self, title_key: &str) -> Result<Option<ContentEntry>>;

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a new entry with empty nested collections and categories.
    fn insert_entry(&self, entry: &NewContentEntry) -> Result<ContentEntry>;

    /// Apply one release update atomically: union-append the languages, remove any
    /// record sharing the new record's identity key, then append the new record.
    fn apply_release(&self, entry_id: &str, update: &ReleaseUpdate) -> Result<()>;

    // =========================================================================
    // Counts (for metrics)
    // =========================================================================

    fn get_entries_count(&self) -> usize;
}
