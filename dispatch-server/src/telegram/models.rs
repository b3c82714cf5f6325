//! Bot API payloads: inbound webhook updates and outbound request bodies.

use serde::{Deserialize, Serialize};

use crate::content_store::MessageRef;

pub type ChatId = i64;

// =============================================================================
// Inbound
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub channel_post: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    pub video: Option<MediaFile>,
    pub document: Option<MediaFile>,
}

impl Message {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef(self.message_id)
    }

    /// Filename of the attached video, or document if there is no video.
    pub fn attached_file_name(&self) -> Option<&str> {
        self.video
            .as_ref()
            .or(self.document.as_ref())
            .and_then(|f| f.file_name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaFile {
    pub file_name: Option<String>,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

// =============================================================================
// Outbound
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl InlineKeyboardMarkup {
    pub fn url_button(text: &str, url: &str) -> Self {
        Self {
            inline_keyboard: vec![vec![InlineKeyboardButton {
                text: text.to_string(),
                url: url.to_string(),
            }]],
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SendMessageBody<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(super) struct SendPhotoBody<'a> {
    pub chat_id: ChatId,
    pub photo: &'a str,
    pub caption: &'a str,
    pub parse_mode: ParseMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub(super) struct CopyMessageBody<'a> {
    pub chat_id: ChatId,
    pub from_chat_id: ChatId,
    pub message_id: i64,
    pub caption: &'a str,
    pub parse_mode: ParseMode,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageActionBody {
    pub chat_id: ChatId,
    pub message_id: i64,
}
