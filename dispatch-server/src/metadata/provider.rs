use async_trait::async_trait;
use thiserror::Error;

use super::models::{CatalogCandidate, MediaKind, ResolvedMetadata};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// An external catalog of movies and TV shows.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search the catalog by title, best matches first.
    async fn search(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<u16>,
    ) -> Result<Vec<CatalogCandidate>, MetadataError>;

    /// Fetch the full record of a search hit.
    async fn details(&self, id: &str, kind: MediaKind) -> Result<ResolvedMetadata, MetadataError>;
}
