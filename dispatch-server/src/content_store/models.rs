//! Content entry models.
//!
//! A `ContentEntry` is the persistent aggregate for one title: its descriptive
//! metadata plus the nested collections of deliverable messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::release_parser::ReleaseKind;

pub const PLACEHOLDER_POSTER: &str =
    "https://via.placeholder.com/400x600.png?text=Poster+Not+Found";
pub const PLACEHOLDER_OVERVIEW: &str = "Details will be updated soon.";

pub const CATEGORY_TRENDING: &str = "Trending Now";
pub const CATEGORY_COMING_SOON: &str = "Coming Soon";

/// Identifier of a message in the private source channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRef(pub i64);

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Series,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Series => "series",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(ContentType::Movie),
            "series" => Some(ContentType::Series),
            _ => None,
        }
    }
}

impl From<ReleaseKind> for ContentType {
    fn from(kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Movie => ContentType::Movie,
            ReleaseKind::SeriesEpisode | ReleaseKind::SeriesPack => ContentType::Series,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub quality: String,
    pub message: MessageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub season: u32,
    pub episode: u32,
    pub message: MessageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPackRecord {
    pub season: u32,
    pub quality: String,
    pub message: MessageRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: String,
    pub external_id: Option<String>,
    pub title: String,
    pub overview: String,
    pub poster: String,
    pub release_date: Option<String>,
    pub rating: f64,
    pub genres: Vec<String>,
    pub languages: BTreeSet<String>,
    pub content_type: ContentType,
    pub categories: BTreeSet<String>,
    pub files: Vec<FileRecord>,
    pub episodes: Vec<EpisodeRecord>,
    pub season_packs: Vec<SeasonPackRecord>,
}

impl ContentEntry {
    pub fn is_shell(&self) -> bool {
        self.external_id.is_none()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn file(&self, quality: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.quality == quality)
    }

    pub fn episode(&self, season: u32, episode: u32) -> Option<&EpisodeRecord> {
        self.episodes
            .iter()
            .find(|e| e.season == season && e.episode == episode)
    }

    pub fn season_pack(&self, season: u32, quality: &str) -> Option<&SeasonPackRecord> {
        self.season_packs
            .iter()
            .find(|p| p.season == season && p.quality == quality)
    }

    /// Year part of the release date ("2021-06-04" -> "2021").
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }
}

/// Fields of an entry at creation time. Nested collections always start empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContentEntry {
    pub external_id: Option<String>,
    pub title: String,
    pub overview: String,
    pub poster: String,
    pub release_date: Option<String>,
    pub rating: f64,
    pub genres: Vec<String>,
    pub content_type: ContentType,
}

/// The record a single ingestion folds into an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseRecord {
    File(FileRecord),
    Episode(EpisodeRecord),
    SeasonPack(SeasonPackRecord),
}

impl ReleaseRecord {
    pub fn content_type(&self) -> ContentType {
        match self {
            ReleaseRecord::File(_) => ContentType::Movie,
            ReleaseRecord::Episode(_) | ReleaseRecord::SeasonPack(_) => ContentType::Series,
        }
    }
}

/// One merge step: union the languages, then replace-by-key the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseUpdate {
    pub languages: BTreeSet<String>,
    pub record: ReleaseRecord,
}

/// Dedup key for shell entries: lower-cased, whitespace collapsed.
pub fn normalize_title_key(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
