use std::sync::Arc;
use tracing::{debug, warn};

use super::models::{CatalogCandidate, MediaKind, ResolvedMetadata};
use super::provider::{MetadataError, MetadataProvider};
use crate::content_store::normalize_title_key;
use crate::server::metrics;

/// Turns a parsed title into canonical metadata, or nothing.
///
/// Every provider failure is reported as absence: ingestion then falls back to a
/// placeholder entry instead of dropping the release.
pub struct MetadataResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl MetadataResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<u16>,
    ) -> Option<ResolvedMetadata> {
        match self.try_resolve(title, kind, year).await {
            Ok(Some(resolved)) => {
                metrics::record_metadata_lookup("found");
                Some(resolved)
            }
            Ok(None) | Err(MetadataError::NotFound) => {
                debug!("No {} match for '{}'", kind.as_str(), title);
                metrics::record_metadata_lookup("not_found");
                None
            }
            Err(e) => {
                warn!("Metadata lookup for '{}' failed: {}", title, e);
                metrics::record_metadata_lookup("error");
                None
            }
        }
    }

    async fn try_resolve(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<u16>,
    ) -> Result<Option<ResolvedMetadata>, MetadataError> {
        let candidates = self.provider.search(title, kind, year).await?;
        let Some(best) = best_candidate(&candidates, title, year) else {
            return Ok(None);
        };
        let details = self.provider.details(&best.id, kind).await?;
        Ok(Some(details))
    }
}

/// Exact (normalized) title matches win, preferring the one from the right year;
/// otherwise the provider's top hit.
fn best_candidate<'a>(
    candidates: &'a [CatalogCandidate],
    title: &str,
    year: Option<u16>,
) -> Option<&'a CatalogCandidate> {
    let key = normalize_title_key(title);
    let exact: Vec<&CatalogCandidate> = candidates
        .iter()
        .filter(|c| normalize_title_key(&c.title) == key)
        .collect();

    exact
        .iter()
        .find(|c| year.is_some() && c.year == year)
        .or_else(|| exact.first())
        .copied()
        .or_else(|| candidates.first())
}
