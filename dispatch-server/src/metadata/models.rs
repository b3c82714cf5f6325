use serde::Serialize;

use crate::release_parser::ReleaseKind;

/// Which side of the external catalog to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

impl From<ReleaseKind> for MediaKind {
    fn from(kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Movie => MediaKind::Movie,
            ReleaseKind::SeriesEpisode | ReleaseKind::SeriesPack => MediaKind::Tv,
        }
    }
}

/// A search hit, before its details are fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCandidate {
    /// Provider-native id, passed back to `MetadataProvider::details`.
    pub id: String,
    pub title: String,
    pub year: Option<u16>,
}

/// Canonical metadata for a title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMetadata {
    /// Catalog key, unique across media kinds (e.g. `tmdb:movie:603`).
    pub external_id: Option<String>,
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    pub release_date: Option<String>,
    pub rating: f64,
    pub genres: Vec<String>,
}
