use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinedrop_dispatch_server::config::{AppConfig, CliConfig, FileConfig};
use cinedrop_dispatch_server::content_store::{ContentStore, SqliteContentStore};
use cinedrop_dispatch_server::metadata::{MetadataProvider, TmdbProvider};
use cinedrop_dispatch_server::server::{self, metrics, RequestsLoggingLevel, ServerState};
use cinedrop_dispatch_server::telegram::{MessagingApi, TelegramClient};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the content database.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on for the webhook.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Public website, linked from announcements and the welcome message.
    #[clap(long)]
    pub site_base_url: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            site_base_url: args.site_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!(
        "Opening SQLite content database at {:?}...",
        config.content_db_path()
    );
    let content_store = Arc::new(SqliteContentStore::new(config.content_db_path())?);

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_content_metrics(content_store.get_entries_count());

    let messaging: Arc<dyn MessagingApi> = Arc::new(TelegramClient::new(
        &config.telegram.api_base_url,
        config.telegram.bot_token.expose(),
        config.telegram.timeout_sec,
    )?);

    let mut tmdb = TmdbProvider::new(
        &config.metadata.base_url,
        config.metadata.api_key.expose().to_string(),
        config.metadata.timeout_sec,
    )?;
    if let Some(language) = &config.metadata.language {
        tmdb = tmdb.with_language(language.clone());
    }
    let metadata: Arc<dyn MetadataProvider> = Arc::new(tmdb);

    let shutdown_token = CancellationToken::new();
    let (state, scheduler) = ServerState::assemble(
        &config,
        content_store,
        messaging,
        metadata,
        env!("GIT_HASH").to_string(),
        shutdown_token.clone(),
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    info!(
        "Dispatching from channel {} as @{}",
        config.telegram.source_channel, config.telegram.bot_username
    );
    if config.telegram.notification_channel.is_none() {
        info!("No notification channel configured, announcements are disabled");
    }

    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
        signal_token.cancel();
    });

    let result = server::run_server(state, shutdown_token.clone()).await;
    shutdown_token.cancel();
    if let Err(e) = scheduler_task.await {
        error!("Deletion scheduler task failed: {}", e);
    }
    result
}
