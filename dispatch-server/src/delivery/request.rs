//! `/start` command handling.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::service::{DeliveryOutcome, DeliveryService};
use crate::deep_link::{DeepLinkError, DeepLinkResolver};
use crate::telegram::{ChatId, InlineKeyboardMarkup, MessagingApi};

pub const NOT_FOUND_TEXT: &str = "Requested file/season not found.";
pub const UNEXPECTED_ERROR_TEXT: &str = "An unexpected error occurred.";
pub const VISIT_WEBSITE_TEXT: &str = "🎬 Visit Website";

/// Terminal state of one retrieval request.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Welcomed,
    Delivered(DeliveryOutcome),
    NotFound,
    DecodeFailed,
}

impl RetrievalOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalOutcome::Welcomed => "welcomed",
            RetrievalOutcome::Delivered(DeliveryOutcome::Delivered { .. }) => "delivered",
            RetrievalOutcome::Delivered(DeliveryOutcome::CopyFailed) => "copy_failed",
            RetrievalOutcome::NotFound => "not_found",
            RetrievalOutcome::DecodeFailed => "decode_failed",
        }
    }
}

pub struct RetrievalHandler {
    api: Arc<dyn MessagingApi>,
    resolver: DeepLinkResolver,
    delivery: DeliveryService,
    bot_username: String,
    site_base_url: Option<String>,
}

impl RetrievalHandler {
    pub fn new(
        api: Arc<dyn MessagingApi>,
        resolver: DeepLinkResolver,
        delivery: DeliveryService,
        bot_username: String,
        site_base_url: Option<String>,
    ) -> Self {
        Self {
            api,
            resolver,
            delivery,
            bot_username,
            site_base_url,
        }
    }

    /// Handle `/start [payload]` from `chat`.
    pub async fn handle_start(&self, chat: ChatId, payload: Option<&str>) -> RetrievalOutcome {
        let Some(token) = payload.map(str::trim).filter(|p| !p.is_empty()) else {
            self.send_welcome(chat).await;
            return RetrievalOutcome::Welcomed;
        };

        match self.resolver.resolve(token) {
            Ok(target) => {
                RetrievalOutcome::Delivered(self.delivery.deliver(chat, &target).await)
            }
            Err(DeepLinkError::NotFound(_)) | Err(DeepLinkError::NoDeliverable(_)) => {
                debug!("Nothing to deliver for token {}", token);
                self.notify(chat, NOT_FOUND_TEXT).await;
                RetrievalOutcome::NotFound
            }
            Err(e @ DeepLinkError::Malformed(_)) => {
                info!("Rejected token from chat {}: {}", chat, e);
                self.notify(chat, UNEXPECTED_ERROR_TEXT).await;
                RetrievalOutcome::DecodeFailed
            }
            Err(e @ DeepLinkError::Store(_)) => {
                error!("Failed to resolve token {}: {}", token, e);
                self.notify(chat, UNEXPECTED_ERROR_TEXT).await;
                RetrievalOutcome::DecodeFailed
            }
        }
    }

    async fn send_welcome(&self, chat: ChatId) {
        let text = format!(
            "👋 Welcome to {}!\n\nBrowse all our content on our website.",
            self.bot_username
        );
        let keyboard = self
            .site_base_url
            .as_deref()
            .map(|url| InlineKeyboardMarkup::url_button(VISIT_WEBSITE_TEXT, url));
        if let Err(e) = self.api.send_text(chat, &text, keyboard.as_ref()).await {
            warn!("Failed to send welcome to chat {}: {}", chat, e);
        }
    }

    async fn notify(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.api.send_text(chat, text, None).await {
            warn!("Failed to notify chat {}: {}", chat, e);
        }
    }
}
