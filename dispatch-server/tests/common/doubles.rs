//! In-process stand-ins for the Bot API and the external catalog.

use super::constants::*;
use async_trait::async_trait;
use cinedrop_dispatch_server::content_store::MessageRef;
use cinedrop_dispatch_server::metadata::{
    CatalogCandidate, MediaKind, MetadataError, MetadataProvider, ResolvedMetadata,
};
use cinedrop_dispatch_server::telegram::{
    ChatId, InlineKeyboardMarkup, MessagingApi, ParseMode, TelegramError,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// One outbound Bot API call, as observed by `RecordingTelegram`.
#[derive(Debug, Clone, PartialEq)]
pub enum TelegramCall {
    Copy {
        to_chat: ChatId,
        from_chat: ChatId,
        message: MessageRef,
        caption: String,
    },
    Delete {
        chat: ChatId,
        message: MessageRef,
    },
    Pin {
        chat: ChatId,
        message: MessageRef,
    },
    Text {
        chat: ChatId,
        text: String,
    },
    Photo {
        chat: ChatId,
        photo_url: String,
        caption: String,
    },
}

/// Accepts every call and remembers it. Sent messages get increasing ids.
pub struct RecordingTelegram {
    calls: Mutex<Vec<TelegramCall>>,
    next_message_id: AtomicI64,
}

impl RecordingTelegram {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI64::new(5000),
        }
    }

    pub fn calls(&self) -> Vec<TelegramCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TelegramCall) -> MessageRef {
        self.calls.lock().unwrap().push(call);
        MessageRef(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl MessagingApi for RecordingTelegram {
    async fn copy_message(
        &self,
        to_chat: ChatId,
        from_chat: ChatId,
        message: MessageRef,
        caption: &str,
        _parse_mode: ParseMode,
    ) -> Result<MessageRef, TelegramError> {
        Ok(self.record(TelegramCall::Copy {
            to_chat,
            from_chat,
            message,
            caption: caption.to_string(),
        }))
    }

    async fn delete_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        self.record(TelegramCall::Delete { chat, message });
        Ok(())
    }

    async fn pin_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        self.record(TelegramCall::Pin { chat, message });
        Ok(())
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        _keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        Ok(self.record(TelegramCall::Text {
            chat,
            text: text.to_string(),
        }))
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        _parse_mode: ParseMode,
        _keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        Ok(self.record(TelegramCall::Photo {
            chat,
            photo_url: photo_url.to_string(),
            caption: caption.to_string(),
        }))
    }
}

/// Catalog that knows only `MOVIE_TITLE`.
pub struct StaticCatalog;

#[async_trait]
impl MetadataProvider for StaticCatalog {
    async fn search(
        &self,
        title: &str,
        kind: MediaKind,
        _year: Option<u16>,
    ) -> Result<Vec<CatalogCandidate>, MetadataError> {
        if kind == MediaKind::Movie && title == MOVIE_TITLE {
            Ok(vec![CatalogCandidate {
                id: "42".to_string(),
                title: MOVIE_TITLE.to_string(),
                year: Some(2021),
            }])
        } else {
            Ok(vec![])
        }
    }

    async fn details(&self, id: &str, _kind: MediaKind) -> Result<ResolvedMetadata, MetadataError> {
        if id != "42" {
            return Err(MetadataError::NotFound);
        }
        Ok(ResolvedMetadata {
            external_id: Some(MOVIE_EXTERNAL_ID.to_string()),
            title: MOVIE_TITLE.to_string(),
            overview: "A movie used in tests.".to_string(),
            poster_url: "https://image.tmdb.org/t/p/w500/example.jpg".to_string(),
            release_date: Some("2021-06-01".to_string()),
            rating: 7.4,
            genres: vec!["Drama".to_string(), "Thriller".to_string()],
        })
    }
}
