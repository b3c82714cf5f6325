use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;

/// Quality recorded when the filename carries no resolution token.
pub const DEFAULT_QUALITY: &str = "HD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseKind {
    Movie,
    SeriesEpisode,
    SeriesPack,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Movie => "movie",
            ReleaseKind::SeriesEpisode => "series_episode",
            ReleaseKind::SeriesPack => "series_pack",
        }
    }
}

/// Structured view of a release filename.
///
/// `season` is set for both series kinds, `episode` only for `SeriesEpisode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRelease {
    pub title: String,
    pub year: Option<u16>,
    pub kind: ReleaseKind,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub quality: String,
    pub languages: BTreeSet<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Filename is empty")]
    Empty,

    #[error("No title could be isolated from '{0}'")]
    NoTitle(String),
}
