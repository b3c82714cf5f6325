//! External catalog lookups.

mod models;
mod provider;
mod resolver;
mod tmdb;

pub use models::{CatalogCandidate, MediaKind, ResolvedMetadata};
pub use provider::{MetadataError, MetadataProvider};
pub use resolver::MetadataResolver;
pub use tmdb::{TmdbProvider, TMDB_BASE_URL, TMDB_IMAGE_BASE};
