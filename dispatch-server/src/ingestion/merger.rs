use std::sync::Arc;
use tracing::debug;

use super::IngestionError;
use crate::content_store::{
    ContentEntry, ContentStore, EpisodeRecord, FileRecord, MessageRef, ReleaseRecord,
    ReleaseUpdate, SeasonPackRecord,
};
use crate::release_parser::{ParsedRelease, ReleaseKind};

/// Folds one release into an entry's nested collections.
pub struct ReleaseMerger {
    store: Arc<dyn ContentStore>,
}

impl ReleaseMerger {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Union the languages and replace-by-key the record for `parsed`.
    /// Returns the record that was stored.
    pub fn merge(
        &self,
        entry: &ContentEntry,
        parsed: &ParsedRelease,
        message: MessageRef,
    ) -> Result<ReleaseRecord, IngestionError> {
        let record = release_record(parsed, message)?;
        if record.content_type() != entry.content_type {
            return Err(IngestionError::KindMismatch {
                entry_id: entry.id.clone(),
                content_type: entry.content_type,
                kind: parsed.kind,
            });
        }

        self.store.apply_release(
            &entry.id,
            &ReleaseUpdate {
                languages: parsed.languages.clone(),
                record: record.clone(),
            },
        )?;
        debug!("Merged {:?} into {}", record, entry.id);
        Ok(record)
    }
}

fn release_record(parsed: &ParsedRelease, message: MessageRef) -> Result<ReleaseRecord, IngestionError> {
    let season = || {
        parsed
            .season
            .ok_or(IngestionError::MissingMarker("season"))
    };

    Ok(match parsed.kind {
        ReleaseKind::Movie => ReleaseRecord::File(FileRecord {
            quality: parsed.quality.clone(),
            message,
        }),
        ReleaseKind::SeriesPack => ReleaseRecord::SeasonPack(SeasonPackRecord {
            season: season()?,
            quality: parsed.quality.clone(),
            message,
        }),
        ReleaseKind::SeriesEpisode => ReleaseRecord::Episode(EpisodeRecord {
            season: season()?,
            episode: parsed
                .episode
                .ok_or(IngestionError::MissingMarker("episode"))?,
            message,
        }),
    })
}
