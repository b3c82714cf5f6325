//! SQLite-backed content store.

use super::models::*;
use super::schema::CONTENT_VERSIONED_SCHEMAS;
use super::trait_def::ContentStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

const ENTRY_COLUMNS: &str =
    "rowid, id, external_id, title, overview, poster, release_date, rating, content_type";

#[derive(Clone)]
pub struct SqliteContentStore {
    conn: Arc<Mutex<Connection>>,
}

/// The scalar columns of `content_entries`, before the child tables are loaded.
struct EntryRow {
    rowid: i64,
    id: String,
    external_id: Option<String>,
    title: String,
    overview: String,
    poster: String,
    release_date: Option<String>,
    rating: f64,
    content_type: String,
}

impl EntryRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(EntryRow {
            rowid: row.get(0)?,
            id: row.get(1)?,
            external_id: row.get(2)?,
            title: row.get(3)?,
            overview: row.get(4)?,
            poster: row.get(5)?,
            release_date: row.get(6)?,
            rating: row.get(7)?,
            content_type: row.get(8)?,
        })
    }
}

impl SqliteContentStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open content database {:?}", db_path))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut conn, CONTENT_VERSIONED_SCHEMAS, "content")?;

        let entry_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM content_entries", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened content database with {} entries", entry_count);

        Ok(SqliteContentStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Content database lock poisoned"))
    }

    // =========================================================================
    // Internal Helper Methods
    // =========================================================================

    fn find_entry_where(
        conn: &Connection,
        condition: &str,
        value: &str,
    ) -> Result<Option<ContentEntry>> {
        let sql = format!(
            "SELECT {} FROM content_entries WHERE {} ORDER BY rowid LIMIT 1",
            ENTRY_COLUMNS, condition
        );
        let row = conn
            .query_row(&sql, params![value], EntryRow::from_row)
            .optional()?;
        match row {
            Some(row) => Ok(Some(Self::load_entry(conn, row)?)),
            None => Ok(None),
        }
    }

    fn get_entry_rowid(conn: &Connection, id: &str) -> Result<Option<i64>> {
        match conn.query_row(
            "SELECT rowid FROM content_entries WHERE id = ?1",
            params![id],
            |r| r.get(0),
        ) {
            Ok(rowid) => Ok(Some(rowid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn load_entry(conn: &Connection, row: EntryRow) -> Result<ContentEntry> {
        let content_type = ContentType::from_db_str(&row.content_type)
            .with_context(|| format!("Unknown content type '{}'", row.content_type))?;

        let genres = conn
            .prepare_cached("SELECT genre FROM entry_genres WHERE entry_rowid = ?1 ORDER BY position")?
            .query_map(params![row.rowid], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        let languages = conn
            .prepare_cached("SELECT language FROM entry_languages WHERE entry_rowid = ?1")?
            .query_map(params![row.rowid], |r| r.get(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;

        let categories = conn
            .prepare_cached("SELECT category FROM entry_categories WHERE entry_rowid = ?1")?
            .query_map(params![row.rowid], |r| r.get(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;

        let files = conn
            .prepare_cached(
                "SELECT quality, message_id FROM entry_files WHERE entry_rowid = ?1 ORDER BY rowid",
            )?
            .query_map(params![row.rowid], |r| {
                Ok(FileRecord {
                    quality: r.get(0)?,
                    message: MessageRef(r.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let episodes = conn
            .prepare_cached(
                "SELECT season, episode, message_id FROM entry_episodes
                 WHERE entry_rowid = ?1 ORDER BY rowid",
            )?
            .query_map(params![row.rowid], |r| {
                Ok(EpisodeRecord {
                    season: r.get(0)?,
                    episode: r.get(1)?,
                    message: MessageRef(r.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let season_packs = conn
            .prepare_cached(
                "SELECT season, quality, message_id FROM entry_season_packs
                 WHERE entry_rowid = ?1 ORDER BY rowid",
            )?
            .query_map(params![row.rowid], |r| {
                Ok(SeasonPackRecord {
                    season: r.get(0)?,
                    quality: r.get(1)?,
                    message: MessageRef(r.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentEntry {
            id: row.id,
            external_id: row.external_id,
            title: row.title,
            overview: row.overview,
            poster: row.poster,
            release_date: row.release_date,
            rating: row.rating,
            genres,
            languages,
            content_type,
            categories,
            files,
            episodes,
            season_packs,
        })
    }

    /// Attach an editorial category to an entry. Ingestion never calls this; the
    /// categories are owned by the catalogue's editorial tooling.
    pub fn add_category(&self, entry_id: &str, category: &str) -> Result<()> {
        let conn = self.lock()?;
        let rowid = Self::get_entry_rowid(&conn, entry_id)?
            .with_context(|| format!("Entry {} not found", entry_id))?;
        conn.execute(
            "INSERT OR IGNORE INTO entry_categories (entry_rowid, category) VALUES (?1, ?2)",
            params![rowid, category],
        )?;
        Ok(())
    }
}

impl ContentStore for SqliteContentStore {
    fn get_entry(&self, id: &str) -> Result<Option<ContentEntry>> {
        let conn = self.lock()?;
        Self::find_entry_where(&conn, "id = ?1", id)
    }

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<ContentEntry>> {
        let conn = self.lock()?;
        Self::find_entry_where(&conn, "external_id = ?1", external_id)
    }

    fn find_shell_by_title_key(&self, title_key: &str) -> Result<Option<ContentEntry>> {
        let conn = self.lock()?;
        Self::find_entry_where(&conn, "external_id IS NULL AND title_key = ?1", title_key)
    }

    fn insert_entry(&self, entry: &NewContentEntry) -> Result<ContentEntry> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO content_entries
                (id, external_id, title, title_key, overview, poster, release_date, rating, content_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id,
                entry.external_id,
                entry.title,
                normalize_title_key(&entry.title),
                entry.overview,
                entry.poster,
                entry.release_date,
                entry.rating,
                entry.content_type.as_str(),
            ],
        )?;
        let rowid = tx.last_insert_rowid();
        for (position, genre) in entry.genres.iter().enumerate() {
            tx.execute(
                "INSERT INTO entry_genres (entry_rowid, position, genre) VALUES (?1, ?2, ?3)",
                params![rowid, position as i64, genre],
            )?;
        }
        tx.commit()?;

        debug!("Inserted content entry {} '{}'", id, entry.title);
        Self::find_entry_where(&conn, "id = ?1", &id)?
            .with_context(|| format!("Entry {} vanished after insert", id))
    }

    fn apply_release(&self, entry_id: &str, update: &ReleaseUpdate) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let rowid = Self::get_entry_rowid(&tx, entry_id)?
            .with_context(|| format!("Entry {} not found", entry_id))?;

        for language in &update.languages {
            tx.execute(
                "INSERT OR IGNORE INTO entry_languages (entry_rowid, language) VALUES (?1, ?2)",
                params![rowid, language],
            )?;
        }

        match &update.record {
            ReleaseRecord::File(file) => {
                tx.execute(
                    "DELETE FROM entry_files WHERE entry_rowid = ?1 AND quality = ?2",
                    params![rowid, file.quality],
                )?;
                tx.execute(
                    "INSERT INTO entry_files (entry_rowid, quality, message_id) VALUES (?1, ?2, ?3)",
                    params![rowid, file.quality, file.message.0],
                )?;
            }
            ReleaseRecord::Episode(ep) => {
                tx.execute(
                    "DELETE FROM entry_episodes WHERE entry_rowid = ?1 AND season = ?2 AND episode = ?3",
                    params![rowid, ep.season, ep.episode],
                )?;
                tx.execute(
                    "INSERT INTO entry_episodes (entry_rowid, season, episode, message_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![rowid, ep.season, ep.episode, ep.message.0],
                )?;
            }
            ReleaseRecord::SeasonPack(pack) => {
                tx.execute(
                    "DELETE FROM entry_season_packs WHERE entry_rowid = ?1 AND season = ?2 AND quality = ?3",
                    params![rowid, pack.season, pack.quality],
                )?;
                tx.execute(
                    "INSERT INTO entry_season_packs (entry_rowid, season, quality, message_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![rowid, pack.season, pack.quality, pack.message.0],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_entries_count(&self) -> usize {
        let Ok(conn) = self.lock() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM content_entries", [], |r| {
            r.get::<_, i64>(0)
        })
        .unwrap_or(0) as usize
    }
}
