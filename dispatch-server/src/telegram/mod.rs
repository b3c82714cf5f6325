//! Telegram Bot API boundary.

mod api;
mod client;
mod markdown;
mod models;
#[cfg(test)]
pub(crate) mod testing;

pub use api::{MessagingApi, TelegramError};
pub use client::{TelegramClient, TELEGRAM_API_URL};
pub use markdown::{escape_markdown, escape_markdown_v2, escape_markdown_v2_url};
pub use models::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MediaFile, Message, ParseMode, Update,
};
