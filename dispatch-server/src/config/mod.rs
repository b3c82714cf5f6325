mod file_config;

pub use file_config::{DeliveryConfig, FileConfig, MetadataConfig, TelegramConfig};

use crate::metadata::TMDB_BASE_URL;
use crate::server::RequestsLoggingLevel;
use crate::telegram::{ChatId, TELEGRAM_API_URL};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RETENTION_MINUTES: u64 = 30;
pub const DEFAULT_METADATA_TIMEOUT_SEC: u64 = 10;
pub const DEFAULT_TELEGRAM_TIMEOUT_SEC: u64 = 15;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub site_base_url: Option<String>,
}

/// A value that must not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct TelegramSettings {
    pub bot_token: Secret,
    pub bot_username: String,
    /// Private channel the releases are posted to.
    pub source_channel: ChatId,
    pub notification_channel: Option<ChatId>,
    pub main_channel_link: Option<String>,
    pub update_channel_link: Option<String>,
    pub developer_link: Option<String>,
    pub webhook_secret: Option<Secret>,
    pub api_base_url: String,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct MetadataSettings {
    pub api_key: Secret,
    pub base_url: String,
    pub language: Option<String>,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub retention: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub site_base_url: Option<String>,

    pub telegram: TelegramSettings,
    pub metadata: MetadataSettings,
    pub delivery: DeliverySettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, the optional TOML file and the
    /// process environment.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        Self::resolve_with_env(cli, file_config, |key| std::env::var(key).ok())
    }

    /// TOML values override CLI values; TOML values override environment values
    /// for the Telegram identifiers and the webhook secret. The bot token and the
    /// metadata API key come from `env` only.
    pub fn resolve_with_env<F>(cli: &CliConfig, file_config: Option<FileConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file_config.unwrap_or_default();
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let site_base_url = file
            .site_base_url
            .or_else(|| cli.site_base_url.clone())
            .map(|url| url.trim_end_matches('/').to_string());

        let tg = file.telegram.unwrap_or_default();
        let md = file.metadata.unwrap_or_default();
        let dl = file.delivery.unwrap_or_default();

        let mut missing = Vec::new();

        let bot_token = env("BOT_TOKEN");
        if bot_token.is_none() {
            missing.push("BOT_TOKEN");
        }
        let api_key = env("TMDB_API_KEY");
        if api_key.is_none() {
            missing.push("TMDB_API_KEY");
        }
        let source_channel = match tg.admin_channel_id {
            Some(id) => Some(id),
            None => parse_chat_id("ADMIN_CHANNEL_ID", env("ADMIN_CHANNEL_ID"))?,
        };
        if source_channel.is_none() {
            missing.push("ADMIN_CHANNEL_ID");
        }
        let bot_username = tg.bot_username.or_else(|| env("BOT_USERNAME"));
        if bot_username.is_none() {
            missing.push("BOT_USERNAME");
        }

        let (Some(bot_token), Some(api_key), Some(source_channel), Some(bot_username)) =
            (bot_token, api_key, source_channel, bot_username)
        else {
            bail!("Missing required settings: {}", missing.join(", "));
        };

        let notification_channel = match tg.notification_channel_id {
            Some(id) => Some(id),
            None => parse_chat_id("NOTIFICATION_CHANNEL_ID", env("NOTIFICATION_CHANNEL_ID"))?,
        };

        let telegram = TelegramSettings {
            bot_token: Secret::new(bot_token),
            bot_username,
            source_channel,
            notification_channel,
            main_channel_link: tg.main_channel_link.or_else(|| env("MAIN_CHANNEL_LINK")),
            update_channel_link: tg.update_channel_link.or_else(|| env("UPDATE_CHANNEL_LINK")),
            developer_link: tg.developer_user_link.or_else(|| env("DEVELOPER_USER_LINK")),
            webhook_secret: tg
                .webhook_secret
                .or_else(|| env("WEBHOOK_SECRET"))
                .map(Secret::new),
            api_base_url: tg
                .api_base_url
                .unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            timeout_sec: tg.timeout_sec.unwrap_or(DEFAULT_TELEGRAM_TIMEOUT_SEC),
        };

        let metadata = MetadataSettings {
            api_key: Secret::new(api_key),
            base_url: md.base_url.unwrap_or_else(|| TMDB_BASE_URL.to_string()),
            language: md.language,
            timeout_sec: md.timeout_sec.unwrap_or(DEFAULT_METADATA_TIMEOUT_SEC),
        };

        let retention_minutes = dl.retention_minutes.unwrap_or(DEFAULT_RETENTION_MINUTES);
        if retention_minutes == 0 {
            bail!("delivery.retention_minutes must be greater than 0");
        }
        let delivery = DeliverySettings {
            retention: Duration::from_secs(retention_minutes * 60),
        };

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            site_base_url,
            telegram,
            metadata,
            delivery,
        })
    }

    pub fn content_db_path(&self) -> PathBuf {
        self.db_dir.join("content.db")
    }
}

fn parse_chat_id(key: &str, value: Option<String>) -> Result<Option<ChatId>> {
    match value {
        None => Ok(None),
        Some(v) => match v.parse::<ChatId>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => bail!("{} is not a valid chat id: {}", key, v),
        },
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
