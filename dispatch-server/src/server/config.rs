use super::RequestsLoggingLevel;
use crate::telegram::ChatId;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// Channel posts from any other chat are ignored.
    pub source_channel: ChatId,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`, if the webhook was registered with one.
    pub webhook_secret: Option<String>,
}
