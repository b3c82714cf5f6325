//! TMDB v3 implementation of `MetadataProvider`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::models::{CatalogCandidate, MediaKind, ResolvedMetadata};
use super::provider::{MetadataError, MetadataProvider};
use crate::content_store::{PLACEHOLDER_OVERVIEW, PLACEHOLDER_POSTER};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
}

#[derive(Deserialize)]
struct Genre {
    name: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<Genre>,
}

fn year_of(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct TmdbProvider {
    client: Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl TmdbProvider {
    /// Create a provider against `base_url` (normally `TMDB_BASE_URL`).
    pub fn new(base_url: &str, api_key: String, timeout_sec: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language: None,
        })
    }

    /// Request localized titles and overviews (e.g. "en-US").
    pub fn with_language(mut self, language: String) -> Self {
        self.language = Some(language);
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MetadataError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query);
        if let Some(language) = &self.language {
            request = request.query(&[("language", language.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(MetadataError::InvalidApiKey),
            StatusCode::NOT_FOUND => return Err(MetadataError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(MetadataError::RateLimited),
            s if !s.is_success() => {
                return Err(MetadataError::Api {
                    status: s.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MetadataError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search(
        &self,
        title: &str,
        kind: MediaKind,
        year: Option<u16>,
    ) -> Result<Vec<CatalogCandidate>, MetadataError> {
        let mut query = vec![("query", title.to_string())];
        if let Some(year) = year {
            let year_param = match kind {
                MediaKind::Movie => "year",
                MediaKind::Tv => "first_air_date_year",
            };
            query.push((year_param, year.to_string()));
        }

        let response: SearchResponse = self
            .get(&format!("/search/{}", kind.as_str()), &query)
            .await?;
        debug!(
            "TMDB {} search for '{}' returned {} results",
            kind.as_str(),
            title,
            response.results.len()
        );

        Ok(response
            .results
            .into_iter()
            .filter_map(|r| {
                let title = r.title.or(r.name)?;
                let date = r.release_date.or(r.first_air_date);
                Some(CatalogCandidate {
                    id: r.id.to_string(),
                    title,
                    year: year_of(date.as_deref()),
                })
            })
            .collect())
    }

    async fn details(&self, id: &str, kind: MediaKind) -> Result<ResolvedMetadata, MetadataError> {
        let details: DetailsResponse = self.get(&format!("/{}/{}", kind.as_str(), id), &[]).await?;

        let title = details
            .title
            .or(details.name)
            .ok_or_else(|| MetadataError::Parse(format!("{} {} has no title", kind.as_str(), id)))?;

        Ok(ResolvedMetadata {
            external_id: Some(format!("tmdb:{}:{}", kind.as_str(), details.id)),
            title,
            overview: non_empty(details.overview).unwrap_or_else(|| PLACEHOLDER_OVERVIEW.to_string()),
            poster_url: non_empty(details.poster_path)
                .map(|p| format!("{}{}", TMDB_IMAGE_BASE, p))
                .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            release_date: non_empty(details.release_date.or(details.first_air_date)),
            rating: details.vote_average,
            genres: details.genres.into_iter().map(|g| g.name).collect(),
        })
    }
}
