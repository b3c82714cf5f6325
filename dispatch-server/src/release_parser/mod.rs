//! Filename parsing for releases posted to the source channel.

mod models;
mod parser;

pub use models::{ParseError, ParsedRelease, ReleaseKind, DEFAULT_QUALITY};
pub use parser::parse_filename;
