//! HTTP client for the Telegram Bot API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::api::{MessagingApi, TelegramError};
use super::models::*;
use crate::content_store::MessageRef;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

pub struct TelegramClient {
    client: reqwest::Client,
    /// `<base>/bot<token>`; never logged.
    bot_url: String,
}

impl TelegramClient {
    pub fn new(base_url: &str, bot_token: &str, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create Telegram HTTP client")?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", base_url.trim_end_matches('/'), bot_token),
        })
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{}", self.bot_url, method);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
            TelegramError::Decode(format!("{} (status {}): {}", method, status, e))
        })?;
        if !parsed.ok {
            return Err(TelegramError::Api {
                code: parsed.error_code.unwrap_or(status.as_u16() as i64),
                description: parsed.description.unwrap_or_default(),
            });
        }
        debug!("Bot API {} ok", method);
        parsed
            .result
            .ok_or_else(|| TelegramError::Decode(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl MessagingApi for TelegramClient {
    async fn copy_message(
        &self,
        to_chat: ChatId,
        from_chat: ChatId,
        message: MessageRef,
        caption: &str,
        parse_mode: ParseMode,
    ) -> Result<MessageRef, TelegramError> {
        let body = CopyMessageBody {
            chat_id: to_chat,
            from_chat_id: from_chat,
            message_id: message.0,
            caption,
            parse_mode,
        };
        let sent: SentMessage = self.call("copyMessage", &body).await?;
        Ok(MessageRef(sent.message_id))
    }

    async fn delete_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        let body = MessageActionBody {
            chat_id: chat,
            message_id: message.0,
        };
        let _: bool = self.call("deleteMessage", &body).await?;
        Ok(())
    }

    async fn pin_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        let body = MessageActionBody {
            chat_id: chat,
            message_id: message.0,
        };
        let _: bool = self.call("pinChatMessage", &body).await?;
        Ok(())
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        let body = SendMessageBody {
            chat_id: chat,
            text,
            reply_markup: keyboard,
        };
        let sent: SentMessage = self.call("sendMessage", &body).await?;
        Ok(MessageRef(sent.message_id))
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        parse_mode: ParseMode,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        let body = SendPhotoBody {
            chat_id: chat,
            photo: photo_url,
            caption,
            parse_mode,
            reply_markup: keyboard,
        };
        let sent: SentMessage = self.call("sendPhoto", &body).await?;
        Ok(MessageRef(sent.message_id))
    }
}
