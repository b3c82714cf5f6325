//! Decoding of user retrieval tokens into deliverable messages.

mod resolver;
mod token;

use thiserror::Error;

pub use resolver::{DeepLinkResolver, ResolvedTarget};
pub use token::DeepLinkToken;

#[derive(Debug, Error)]
pub enum DeepLinkError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Nothing to deliver for entry {0}")]
    NoDeliverable(String),

    #[error("No record for token {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
