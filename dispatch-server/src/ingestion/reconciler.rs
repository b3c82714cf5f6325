//! Maps a parsed release to exactly one persisted entry.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::content_store::{
    normalize_title_key, ContentEntry, ContentStore, ContentType, NewContentEntry,
    PLACEHOLDER_OVERVIEW, PLACEHOLDER_POSTER,
};
use crate::metadata::ResolvedMetadata;
use crate::release_parser::ParsedRelease;
use crate::server::metrics;

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub entry: ContentEntry,
    pub created: bool,
}

pub struct ContentReconciler {
    store: Arc<dyn ContentStore>,
}

impl ContentReconciler {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Find the entry for this release, creating it on first sighting.
    ///
    /// Catalog-backed entries are keyed by external id, shells by normalized
    /// title. Find-then-insert is not atomic: two concurrent first sightings
    /// can both create an entry.
    pub fn reconcile(
        &self,
        parsed: &ParsedRelease,
        resolved: Option<&ResolvedMetadata>,
    ) -> Result<Reconciled> {
        let content_type = ContentType::from(parsed.kind);

        if let Some((meta, external_id)) =
            resolved.and_then(|m| m.external_id.as_deref().map(|id| (m, id)))
        {
            if let Some(entry) = self.store.find_by_external_id(external_id)? {
                return Ok(Reconciled {
                    entry,
                    created: false,
                });
            }

            let entry = self.store.insert_entry(&NewContentEntry {
                external_id: Some(external_id.to_string()),
                title: meta.title.clone(),
                overview: meta.overview.clone(),
                poster: meta.poster_url.clone(),
                release_date: meta.release_date.clone(),
                rating: meta.rating,
                genres: meta.genres.clone(),
                content_type,
            })?;
            info!(
                "Created {} entry '{}' ({}) for {}",
                content_type.as_str(),
                entry.title,
                entry.id,
                external_id
            );
            metrics::record_entry_created("catalog");
            return Ok(Reconciled {
                entry,
                created: true,
            });
        }

        if let Some(entry) = self
            .store
            .find_shell_by_title_key(&normalize_title_key(&parsed.title))?
        {
            return Ok(Reconciled {
                entry,
                created: false,
            });
        }

        let entry = self.store.insert_entry(&NewContentEntry {
            external_id: None,
            title: parsed.title.clone(),
            overview: PLACEHOLDER_OVERVIEW.to_string(),
            poster: PLACEHOLDER_POSTER.to_string(),
            release_date: None,
            rating: 0.0,
            genres: vec![],
            content_type,
        })?;
        info!(
            "Created placeholder {} entry '{}' ({})",
            content_type.as_str(),
            entry.title,
            entry.id
        );
        metrics::record_entry_created("shell");
        Ok(Reconciled {
            entry,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_store::SqliteContentStore;
    use crate::release_parser::parse_filename;
    use tempfile::TempDir;

    fn reconciler() -> (TempDir, Arc<SqliteContentStore>, ContentReconciler) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SqliteContentStore::new(dir.path().join("content.db")).unwrap());
        let reconciler = ContentReconciler::new(store.clone());
        (dir, store, reconciler)
    }

    fn matrix() -> ResolvedMetadata {
        ResolvedMetadata {
            external_id: Some("tmdb:movie:603".to_string()),
            title: "The Matrix".to_string(),
            overview: "A hacker learns the truth.".to_string(),
            poster_url: "https://image.tmdb.org/t/p/w500/m.jpg".to_string(),
            release_date: Some("1999-03-30".to_string()),
            rating: 8.2,
            genres: vec!["Action".to_string()],
        }
    }

    #[test]
    fn catalog_match_creates_once() {
        let (_dir, store, reconciler) = reconciler();
        let parsed = parse_filename("The.Matrix.1999.1080p.mkv").unwrap();

        let first = reconciler.reconcile(&parsed, Some(&matrix())).unwrap();
        assert!(first.created);
        assert_eq!(first.entry.external_id.as_deref(), Some("tmdb:movie:603"));
        assert_eq!(first.entry.title, "The Matrix");
        assert_eq!(first.entry.content_type, ContentType::Movie);
        assert!(first.entry.categories.is_empty());

        let mut changed = matrix();
        changed.title = "Matrix, The".to_string();
        let second = reconciler.reconcile(&parsed, Some(&changed)).unwrap();
        assert!(!second.created);
        assert_eq!(second.entry.id, first.entry.id);
        assert_eq!(second.entry.title, "The Matrix");
        assert_eq!(store.get_entries_count(), 1);
    }

    #[test]
    fn unresolved_release_gets_a_shell() {
        let (_dir, store, reconciler) = reconciler();
        let parsed = parse_filename("Some.Obscure.Show.S01E01.mkv").unwrap();

        let shell = reconciler.reconcile(&parsed, None).unwrap();
        assert!(shell.created);
        assert!(shell.entry.is_shell());
        assert_eq!(shell.entry.poster, PLACEHOLDER_POSTER);
        assert_eq!(shell.entry.overview, PLACEHOLDER_OVERVIEW);
        assert_eq!(shell.entry.rating, 0.0);
        assert_eq!(shell.entry.content_type, ContentType::Series);

        let again = parse_filename("some.obscure.SHOW.S01E02.mkv").unwrap();
        let second = reconciler.reconcile(&again, None).unwrap();
        assert!(!second.created);
        assert_eq!(second.entry.id, shell.entry.id);
        assert_eq!(store.get_entries_count(), 1);
    }

    #[test]
    fn resolution_without_external_id_takes_shell_path() {
        let (_dir, _store, reconciler) = reconciler();
        let parsed = parse_filename("Example.Movie.2021.1080p.WEB-DL.mkv").unwrap();
        let mut meta = matrix();
        meta.external_id = None;

        let reconciled = reconciler.reconcile(&parsed, Some(&meta)).unwrap();
        assert!(reconciled.entry.is_shell());
        assert_eq!(reconciled.entry.title, "Example Movie");
    }

    #[test]
    fn shell_lookup_ignores_catalog_entries() {
        let (_dir, store, reconciler) = reconciler();
        let parsed = parse_filename("The.Matrix.1999.720p.mkv").unwrap();
        reconciler.reconcile(&parsed, Some(&matrix())).unwrap();

        let shell = reconciler.reconcile(&parsed, None).unwrap();
        assert!(shell.created);
        assert!(shell.entry.is_shell());
        assert_eq!(store.get_entries_count(), 2);
    }
}
