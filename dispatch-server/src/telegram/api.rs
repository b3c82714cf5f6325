use async_trait::async_trait;
use thiserror::Error;

use super::models::{ChatId, InlineKeyboardMarkup, ParseMode};
use crate::content_store::MessageRef;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed Bot API response: {0}")]
    Decode(String),
}

/// The message delivery boundary.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Copy `message` from `from_chat` into `to_chat` with a new caption.
    /// Returns the id of the copy.
    async fn copy_message(
        &self,
        to_chat: ChatId,
        from_chat: ChatId,
        message: MessageRef,
        caption: &str,
        parse_mode: ParseMode,
    ) -> Result<MessageRef, TelegramError>;

    async fn delete_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError>;

    async fn pin_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError>;

    /// Send a plain text message.
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError>;

    /// Send a photo by URL with a caption.
    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        parse_mode: ParseMode,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError>;
}
