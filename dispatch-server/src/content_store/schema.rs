//! SQLite schema for the content database.
//!
//! Entries live in `content_entries`; every nested collection of an entry is a
//! child table keyed by `entry_rowid`, with a unique constraint on the record's
//! identity key. Child rows are read back ordered by their own rowid, which
//! preserves insertion order.

use crate::sqlite_column;
use crate::sqlite_persistence::{ForeignKey, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

const ENTRY_FK: ForeignKey = ForeignKey {
    foreign_table: "content_entries",
    foreign_column: "rowid",
    cascade: true,
};

const CONTENT_ENTRIES_TABLE: Table = Table {
    name: "content_entries",
    columns: &[
        sqlite_column!("rowid", SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", SqlType::Text, non_null = true),
        sqlite_column!("external_id", SqlType::Text),
        sqlite_column!("title", SqlType::Text, non_null = true),
        sqlite_column!("title_key", SqlType::Text, non_null = true),
        sqlite_column!("overview", SqlType::Text, non_null = true),
        sqlite_column!("poster", SqlType::Text, non_null = true),
        sqlite_column!("release_date", SqlType::Text),
        sqlite_column!("rating", SqlType::Real, non_null = true),
        sqlite_column!("content_type", SqlType::Text, non_null = true), // 'movie', 'series'
        sqlite_column!(
            "created",
            SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    // external_id is not unique: two concurrent first sightings may both insert.
    indices: &[
        ("idx_entries_external_id", "external_id"),
        ("idx_entries_title_key", "title_key"),
    ],
    unique_constraints: &[&["id"]],
};

const ENTRY_GENRES_TABLE: Table = Table {
    name: "entry_genres",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("position", SqlType::Integer, non_null = true),
        sqlite_column!("genre", SqlType::Text, non_null = true),
    ],
    indices: &[("idx_genres_entry", "entry_rowid")],
    unique_constraints: &[&["entry_rowid", "position"]],
};

const ENTRY_LANGUAGES_TABLE: Table = Table {
    name: "entry_languages",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("language", SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["entry_rowid", "language"]],
};

const ENTRY_CATEGORIES_TABLE: Table = Table {
    name: "entry_categories",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("category", SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["entry_rowid", "category"]],
};

const ENTRY_FILES_TABLE: Table = Table {
    name: "entry_files",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("quality", SqlType::Text, non_null = true),
        sqlite_column!("message_id", SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["entry_rowid", "quality"]],
};

const ENTRY_EPISODES_TABLE: Table = Table {
    name: "entry_episodes",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("season", SqlType::Integer, non_null = true),
        sqlite_column!("episode", SqlType::Integer, non_null = true),
        sqlite_column!("message_id", SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["entry_rowid", "season", "episode"]],
};

const ENTRY_SEASON_PACKS_TABLE: Table = Table {
    name: "entry_season_packs",
    columns: &[
        sqlite_column!(
            "entry_rowid",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ENTRY_FK)
        ),
        sqlite_column!("season", SqlType::Integer, non_null = true),
        sqlite_column!("quality", SqlType::Text, non_null = true),
        sqlite_column!("message_id", SqlType::Integer, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["entry_rowid", "season", "quality"]],
};

pub const CONTENT_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        CONTENT_ENTRIES_TABLE,
        ENTRY_GENRES_TABLE,
        ENTRY_LANGUAGES_TABLE,
        ENTRY_CATEGORIES_TABLE,
        ENTRY_FILES_TABLE,
        ENTRY_EPISODES_TABLE,
        ENTRY_SEASON_PACKS_TABLE,
    ],
    migration: None,
}];
