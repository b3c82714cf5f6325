//! Retrieval token grammar.
//!
//! Tokens are `_`-delimited and carried as the `/start` payload:
//!
//! - `<entry>`                   bare entry, nothing to deliver
//! - `<entry>_S<season>_<q>`     season pack
//! - `<entry>_<season>_<ep>`     single episode
//! - `<entry>_<q>`               movie file

use std::fmt;

use super::DeepLinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLinkToken {
    Entry {
        entry_id: String,
    },
    SeasonPack {
        entry_id: String,
        season: u32,
        quality: String,
    },
    Episode {
        entry_id: String,
        season: u32,
        episode: u32,
    },
    File {
        entry_id: String,
        quality: String,
    },
}

impl DeepLinkToken {
    pub fn parse(token: &str) -> Result<Self, DeepLinkError> {
        let malformed = || DeepLinkError::Malformed(token.to_string());

        let parts: Vec<&str> = token.trim().split('_').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(malformed());
        }
        let entry_id = parts[0].to_string();

        match parts.as_slice() {
            [_] => Ok(DeepLinkToken::Entry { entry_id }),
            [_, quality] => Ok(DeepLinkToken::File {
                entry_id,
                quality: quality.to_string(),
            }),
            [_, season, third] => {
                if let Some(pack_season) = season.strip_prefix('S') {
                    let season = pack_season.parse().map_err(|_| malformed())?;
                    return Ok(DeepLinkToken::SeasonPack {
                        entry_id,
                        season,
                        quality: third.to_string(),
                    });
                }
                match (season.parse(), third.parse()) {
                    (Ok(season), Ok(episode)) => Ok(DeepLinkToken::Episode {
                        entry_id,
                        season,
                        episode,
                    }),
                    _ => Err(malformed()),
                }
            }
            _ => Err(malformed()),
        }
    }

    pub fn entry_id(&self) -> &str {
        match self {
            DeepLinkToken::Entry { entry_id }
            | DeepLinkToken::SeasonPack { entry_id, .. }
            | DeepLinkToken::Episode { entry_id, .. }
            | DeepLinkToken::File { entry_id, .. } => entry_id,
        }
    }
}

impl fmt::Display for DeepLinkToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeepLinkToken::Entry { entry_id } => write!(f, "{}", entry_id),
            DeepLinkToken::SeasonPack {
                entry_id,
                season,
                quality,
            } => write!(f, "{}_S{}_{}", entry_id, season, quality),
            DeepLinkToken::Episode {
                entry_id,
                season,
                episode,
            } => write!(f, "{}_{}_{}", entry_id, season, episode),
            DeepLinkToken::File { entry_id, quality } => write!(f, "{}_{}", entry_id, quality),
        }
    }
}
