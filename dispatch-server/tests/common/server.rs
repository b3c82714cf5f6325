//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own content database, a
//! recording Bot API double and a fake catalog.

use super::constants::*;
use super::doubles::{RecordingTelegram, StaticCatalog, TelegramCall};
use cinedrop_dispatch_server::config::{AppConfig, CliConfig};
use cinedrop_dispatch_server::content_store::{ContentEntry, ContentStore, SqliteContentStore};
use cinedrop_dispatch_server::server::{make_app, RequestsLoggingLevel, ServerState};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Test server instance with an isolated database
///
/// When dropped, the server and its deletion scheduler shut down and temp
/// resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Content store for direct database access in tests
    pub content_store: Arc<SqliteContentStore>,

    telegram: Arc<RecordingTelegram>,
    _temp_db_dir: TempDir,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Spawns a server that accepts webhook calls without a secret token
    pub async fn spawn() -> Self {
        Self::spawn_with_env(HashMap::new()).await
    }

    /// Spawns a server that requires `WEBHOOK_SECRET` on every webhook call
    pub async fn spawn_with_secret() -> Self {
        Self::spawn_with_env(HashMap::from([("WEBHOOK_SECRET", WEBHOOK_SECRET.to_string())]))
            .await
    }

    async fn spawn_with_env(extra_env: HashMap<&'static str, String>) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");

        let mut env: HashMap<&'static str, String> = HashMap::from([
            ("BOT_TOKEN", "123:test-token".to_string()),
            ("TMDB_API_KEY", "test-api-key".to_string()),
            ("ADMIN_CHANNEL_ID", SOURCE_CHANNEL.to_string()),
            ("NOTIFICATION_CHANNEL_ID", NOTIFICATION_CHANNEL.to_string()),
            ("BOT_USERNAME", BOT_USERNAME.to_string()),
        ]);
        env.extend(extra_env);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let cli = CliConfig {
            db_dir: Some(temp_db_dir.path().to_path_buf()),
            port,
            metrics_port: 0,
            logging_level: RequestsLoggingLevel::None,
            site_base_url: Some("https://cinedrop.test".to_string()),
        };
        let config = AppConfig::resolve_with_env(&cli, None, |key| env.get(key).cloned())
            .expect("Failed to resolve test config");

        let content_store = Arc::new(
            SqliteContentStore::new(config.content_db_path())
                .expect("Failed to open content store"),
        );
        let telegram = Arc::new(RecordingTelegram::new());

        let shutdown = CancellationToken::new();
        let (state, scheduler) = ServerState::assemble(
            &config,
            content_store.clone(),
            telegram.clone(),
            Arc::new(StaticCatalog),
            "test".to_string(),
            shutdown.clone(),
        );
        tokio::spawn(scheduler.run());

        // Spawn server in background task with graceful shutdown
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, make_app(state))
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            content_store,
            telegram,
            _temp_db_dir: temp_db_dir,
            shutdown,
        };

        server.wait_for_ready().await;

        server
    }

    /// Every Bot API call the server made so far
    pub fn telegram_calls(&self) -> Vec<TelegramCall> {
        self.telegram.calls()
    }

    /// Polls the recorded calls until `predicate` holds, for work the server
    /// finishes in the background (announcements)
    pub async fn wait_for_calls<F>(&self, predicate: F) -> Vec<TelegramCall>
    where
        F: Fn(&[TelegramCall]) -> bool,
    {
        let start = std::time::Instant::now();
        loop {
            let calls = self.telegram_calls();
            if predicate(&calls) {
                return calls;
            }
            if start.elapsed() > Duration::from_millis(SERVER_READY_TIMEOUT_MS) {
                panic!("Expected Bot API calls never happened, got {:?}", calls);
            }
            tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
        }
    }

    /// The entry the fake catalog resolves `MOVIE_TITLE` to
    pub fn movie_entry(&self) -> Option<ContentEntry> {
        self.content_store
            .find_by_external_id(MOVIE_EXTERNAL_ID)
            .expect("Content store lookup failed")
    }

    /// Waits for the server to become ready by polling the status endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
