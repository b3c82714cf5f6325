use std::sync::Arc;
use tracing::debug;

use super::token::DeepLinkToken;
use super::DeepLinkError;
use crate::content_store::{ContentEntry, ContentStore, ContentType, MessageRef};

/// The source-channel message a token points to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub entry: ContentEntry,
    pub message: MessageRef,
    /// "Complete Season 2 (1080p)", "S01E03" or "(720p)".
    pub descriptor: String,
}

pub struct DeepLinkResolver {
    store: Arc<dyn ContentStore>,
}

impl DeepLinkResolver {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn resolve(&self, token: &str) -> Result<ResolvedTarget, DeepLinkError> {
        let token = DeepLinkToken::parse(token)?;
        if matches!(token, DeepLinkToken::Entry { .. }) {
            return Err(DeepLinkError::NoDeliverable(token.entry_id().to_string()));
        }

        let entry = self
            .store
            .get_entry(token.entry_id())?
            .ok_or_else(|| DeepLinkError::NotFound(token.to_string()))?;

        let (message, descriptor) = match &token {
            DeepLinkToken::SeasonPack {
                season, quality, ..
            } => entry.season_pack(*season, quality).map(|p| {
                (
                    p.message,
                    format!("Complete Season {} ({})", season, quality),
                )
            }),
            DeepLinkToken::Episode {
                season, episode, ..
            } if entry.content_type == ContentType::Series => entry
                .episode(*season, *episode)
                .map(|e| (e.message, format!("S{:02}E{:02}", season, episode))),
            DeepLinkToken::File { quality, .. } if entry.content_type == ContentType::Movie => {
                entry
                    .file(quality)
                    .map(|f| (f.message, format!("({})", quality)))
            }
            _ => None,
        }
        .ok_or_else(|| {
            debug!("Token {} matched entry {} but no record", token, entry.id);
            DeepLinkError::NotFound(token.to_string())
        })?;

        Ok(ResolvedTarget {
            entry,
            message,
            descriptor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_store::{
        NewContentEntry, ReleaseRecord, ReleaseUpdate, SeasonPackRecord, SqliteContentStore,
        EpisodeRecord, FileRecord,
    };
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn store() -> (TempDir, Arc<SqliteContentStore>) {
        let dir = TempDir::new().unwrap();
        let store = SqliteContentStore::new(dir.path().join("content.db")).unwrap();
        (dir, Arc::new(store))
    }

    fn insert(store: &SqliteContentStore, content_type: ContentType) -> ContentEntry {
        store
            .insert_entry(&NewContentEntry {
                external_id: None,
                title: "Example".to_string(),
                overview: String::new(),
                poster: String::new(),
                release_date: None,
                rating: 0.0,
                genres: vec![],
                content_type,
            })
            .unwrap()
    }

    fn apply(store: &SqliteContentStore, id: &str, record: ReleaseRecord) {
        store
            .apply_release(
                id,
                &ReleaseUpdate {
                    languages: BTreeSet::new(),
                    record,
                },
            )
            .unwrap();
    }

    #[test]
    fn resolves_season_pack() {
        let (_dir, store) = store();
        let entry = insert(&store, ContentType::Series);
        apply(
            &store,
            &entry.id,
            ReleaseRecord::SeasonPack(SeasonPackRecord {
                season: 2,
                quality: "1080p".to_string(),
                message: MessageRef(55),
            }),
        );
        let resolver = DeepLinkResolver::new(store.clone());

        let target = resolver.resolve(&format!("{}_S2_1080p", entry.id)).unwrap();
        assert_eq!(target.message, MessageRef(55));
        assert_eq!(target.descriptor, "Complete Season 2 (1080p)");

        assert!(matches!(
            resolver.resolve(&format!("{}_S2_720p", entry.id)),
            Err(DeepLinkError::NotFound(_))
        ));
    }

    #[test]
    fn resolves_episode_only_on_series() {
        let (_dir, store) = store();
        let series = insert(&store, ContentType::Series);
        apply(
            &store,
            &series.id,
            ReleaseRecord::Episode(EpisodeRecord {
                season: 1,
                episode: 3,
                message: MessageRef(9),
            }),
        );
        let movie = insert(&store, ContentType::Movie);
        let resolver = DeepLinkResolver::new(store.clone());

        let target = resolver.resolve(&format!("{}_1_3", series.id)).unwrap();
        assert_eq!(target.descriptor, "S01E03");
        assert_eq!(target.message, MessageRef(9));

        assert!(matches!(
            resolver.resolve(&format!("{}_1_3", movie.id)),
            Err(DeepLinkError::NotFound(_))
        ));
    }

    #[test]
    fn resolves_file_only_on_movie() {
        let (_dir, store) = store();
        let movie = insert(&store, ContentType::Movie);
        apply(
            &store,
            &movie.id,
            ReleaseRecord::File(FileRecord {
                quality: "720p".to_string(),
                message: MessageRef(4),
            }),
        );
        let series = insert(&store, ContentType::Series);
        let resolver = DeepLinkResolver::new(store.clone());

        let target = resolver.resolve(&format!("{}_720p", movie.id)).unwrap();
        assert_eq!(target.descriptor, "(720p)");
        assert_eq!(target.entry.id, movie.id);

        assert!(matches!(
            resolver.resolve(&format!("{}_720p", series.id)),
            Err(DeepLinkError::NotFound(_))
        ));
    }

    #[test]
    fn unknown_entry_is_not_found_and_bare_id_has_no_deliverable() {
        let (_dir, store) = store();
        let movie = insert(&store, ContentType::Movie);
        let resolver = DeepLinkResolver::new(store);

        assert!(matches!(
            resolver.resolve("0123456789abcdef0123456789abcdef_720p"),
            Err(DeepLinkError::NotFound(_))
        ));
        assert!(matches!(
            resolver.resolve(&movie.id),
            Err(DeepLinkError::NoDeliverable(_))
        ));
        assert!(matches!(
            resolver.resolve("garbage_1_x"),
            Err(DeepLinkError::Malformed(_))
        ));
    }
}
