//! Recording `MessagingApi` double for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use super::api::{MessagingApi, TelegramError};
use super::models::{ChatId, InlineKeyboardMarkup, ParseMode};
use crate::content_store::MessageRef;

#[derive(Debug, Clone, PartialEq)]
pub enum SentCall {
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
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Photo {
        chat: ChatId,
        photo_url: String,
        caption: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
}

#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<SentCall>>,
    next_id: AtomicI64,
    pub fail_copy: AtomicBool,
    pub fail_photo: AtomicBool,
    pub fail_pin: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        }
    }

    pub fn failing_copies() -> Self {
        let messenger = Self::new();
        messenger.fail_copy.store(true, Ordering::SeqCst);
        messenger
    }

    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(ChatId, MessageRef)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SentCall::Delete { chat, message } => Some((chat, message)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SentCall) -> MessageRef {
        self.calls.lock().unwrap().push(call);
        MessageRef(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn rejected() -> TelegramError {
        TelegramError::Api {
            code: 400,
            description: "Bad Request: message to copy not found".to_string(),
        }
    }
}

#[async_trait]
impl MessagingApi for RecordingMessenger {
    async fn copy_message(
        &self,
        to_chat: ChatId,
        from_chat: ChatId,
        message: MessageRef,
        caption: &str,
        _parse_mode: ParseMode,
    ) -> Result<MessageRef, TelegramError> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(Self::rejected());
        }
        Ok(self.record(SentCall::Copy {
            to_chat,
            from_chat,
            message,
            caption: caption.to_string(),
        }))
    }

    async fn delete_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        self.record(SentCall::Delete { chat, message });
        Ok(())
    }

    async fn pin_message(&self, chat: ChatId, message: MessageRef) -> Result<(), TelegramError> {
        if self.fail_pin.load(Ordering::SeqCst) {
            return Err(Self::rejected());
        }
        self.record(SentCall::Pin { chat, message });
        Ok(())
    }

    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        Ok(self.record(SentCall::Text {
            chat,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        }))
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        _parse_mode: ParseMode,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<MessageRef, TelegramError> {
        if self.fail_photo.load(Ordering::SeqCst) {
            return Err(Self::rejected());
        }
        Ok(self.record(SentCall::Photo {
            chat,
            photo_url: photo_url.to_string(),
            caption: caption.to_string(),
            keyboard: keyboard.cloned(),
        }))
    }
}
