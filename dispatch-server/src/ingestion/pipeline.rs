//! Channel post to stored release.
//!
//! 1. Parse the filename
//! 2. Resolve metadata (absence is not an error)
//! 3. Reconcile to one entry, creating it on first sighting
//! 4. Merge the release into the entry
//! 5. Announce newly created entries in the background

use std::sync::Arc;
use tracing::{info, warn};

use super::merger::ReleaseMerger;
use super::reconciler::ContentReconciler;
use super::IngestionError;
use crate::content_store::{ContentStore, MessageRef, ReleaseRecord};
use crate::metadata::{MediaKind, MetadataResolver};
use crate::notifications::ContentAnnouncer;
use crate::release_parser::parse_filename;
use crate::server::metrics;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub entry_id: String,
    pub title: String,
    pub created: bool,
    pub record: ReleaseRecord,
}

pub struct IngestionPipeline {
    resolver: MetadataResolver,
    reconciler: ContentReconciler,
    merger: ReleaseMerger,
    announcer: Arc<ContentAnnouncer>,
}

impl IngestionPipeline {
    pub fn new(
        store: Arc<dyn ContentStore>,
        resolver: MetadataResolver,
        announcer: Arc<ContentAnnouncer>,
    ) -> Self {
        Self {
            resolver,
            reconciler: ContentReconciler::new(Arc::clone(&store)),
            merger: ReleaseMerger::new(store),
            announcer,
        }
    }

    pub async fn ingest(
        &self,
        filename: &str,
        message: MessageRef,
    ) -> Result<IngestionReport, IngestionError> {
        let result = self.run(filename, message).await;
        let outcome = match &result {
            Ok(report) if report.created => "created",
            Ok(_) => "merged",
            Err(IngestionError::Parse(_)) => "parse_failed",
            Err(IngestionError::KindMismatch { .. }) => "kind_mismatch",
            Err(_) => "error",
        };
        metrics::record_ingestion(outcome);
        if let Err(e) = &result {
            warn!("Skipped '{}' (message {}): {}", filename, message, e);
        }
        result
    }

    async fn run(
        &self,
        filename: &str,
        message: MessageRef,
    ) -> Result<IngestionReport, IngestionError> {
        let parsed = parse_filename(filename)?;
        let resolved = self
            .resolver
            .resolve(&parsed.title, MediaKind::from(parsed.kind), parsed.year)
            .await;

        let reconciled = self.reconciler.reconcile(&parsed, resolved.as_ref())?;
        let record = self.merger.merge(&reconciled.entry, &parsed, message)?;
        info!(
            "Ingested '{}' as {} of '{}'",
            filename,
            parsed.kind.as_str(),
            reconciled.entry.title
        );

        let report = IngestionReport {
            entry_id: reconciled.entry.id.clone(),
            title: reconciled.entry.title.clone(),
            created: reconciled.created,
            record,
        };

        if reconciled.created {
            let announcer = Arc::clone(&self.announcer);
            let entry = reconciled.entry;
            tokio::spawn(async move {
                announcer.announce(&entry).await;
            });
        }

        Ok(report)
    }
}
