//! Shared constants for end-to-end tests
//!
//! When test data changes (channel ids, catalog titles, etc.),
//! update only this file.

// ============================================================================
// Telegram Identity
// ============================================================================

/// Channel the uploads are posted to
pub const SOURCE_CHANNEL: i64 = -1001000000001;

/// Channel receiving announcements
pub const NOTIFICATION_CHANNEL: i64 = -1001000000002;

/// Private chat of the user asking for files
pub const USER_CHAT: i64 = 424242;

/// Some chat the bot is a member of but does not ingest from
pub const OTHER_CHANNEL: i64 = -1001000000099;

pub const BOT_USERNAME: &str = "CineDropTestBot";

/// Secret token configured by `TestServer::spawn_with_secret`
pub const WEBHOOK_SECRET: &str = "hook-secret-123";

// ============================================================================
// Test Catalog
// ============================================================================

/// The only movie the fake catalog knows
pub const MOVIE_TITLE: &str = "Example Movie";

/// Catalog key the fake catalog assigns to `MOVIE_TITLE`
pub const MOVIE_EXTERNAL_ID: &str = "tmdb:movie:42";

pub const MOVIE_1080P_FILE: &str = "Example.Movie.2021.1080p.WEB-DL.mkv";

pub const MOVIE_720P_FILE: &str = "Example.Movie.2021.720p.Hindi.mkv";

/// A series the fake catalog does not know
pub const SHOW_EPISODE_FILE: &str = "Unknown.Show.S02E05.720p.mkv";

// ============================================================================
// Test Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Polling interval when waiting for server to start (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Default request timeout for test HTTP client (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
