//! Ingestion of files posted to the source channel.

mod merger;
mod pipeline;
mod reconciler;

use thiserror::Error;

use crate::content_store::ContentType;
use crate::release_parser::{ParseError, ReleaseKind};

pub use merger::ReleaseMerger;
pub use pipeline::{IngestionPipeline, IngestionReport};
pub use reconciler::{ContentReconciler, Reconciled};

/// Errors that end the ingestion of one post.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Unparseable filename: {0}")]
    Parse(#[from] ParseError),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Entry {entry_id} is a {} but the release is a {}", content_type.as_str(), kind.as_str())]
    KindMismatch {
        entry_id: String,
        content_type: ContentType,
        kind: ReleaseKind,
    },

    #[error("Release has no {0} number")]
    MissingMarker(&'static str),
}
