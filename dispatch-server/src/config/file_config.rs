use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub site_base_url: Option<String>,

    // Sections
    pub telegram: Option<TelegramConfig>,
    pub metadata: Option<MetadataConfig>,
    pub delivery: Option<DeliveryConfig>,
}

/// Bot identity and channels. The bot token is read from the environment only.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub admin_channel_id: Option<i64>,
    pub notification_channel_id: Option<i64>,
    pub bot_username: Option<String>,
    pub main_channel_link: Option<String>,
    pub update_channel_link: Option<String>,
    pub developer_user_link: Option<String>,
    pub webhook_secret: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout_sec: Option<u64>,
}

/// External catalog. The API key is read from the environment only.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MetadataConfig {
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub timeout_sec: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Minutes a delivered file stays in the user's chat.
    pub retention_minutes: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
