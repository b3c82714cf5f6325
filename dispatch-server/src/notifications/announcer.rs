//! Announces newly created entries to the broadcast channel.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::models::{AnnounceOutcome, Announcement, SkipReason};
use crate::content_store::{
    ContentEntry, CATEGORY_COMING_SOON, CATEGORY_TRENDING, PLACEHOLDER_POSTER,
};
use crate::server::metrics;
use crate::telegram::{escape_markdown, ChatId, InlineKeyboardMarkup, MessagingApi, ParseMode};

pub const WATCH_BUTTON_TEXT: &str = "➡️ Watch / Download on Website";

pub struct ContentAnnouncer {
    api: Arc<dyn MessagingApi>,
    channel: Option<ChatId>,
    site_base_url: Option<String>,
}

impl ContentAnnouncer {
    pub fn new(
        api: Arc<dyn MessagingApi>,
        channel: Option<ChatId>,
        site_base_url: Option<String>,
    ) -> Self {
        Self {
            api,
            channel,
            site_base_url: site_base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Post the entry's poster with a caption; never fails the caller.
    pub async fn announce(&self, entry: &ContentEntry) -> AnnounceOutcome {
        let outcome = self.try_announce(entry).await;
        metrics::record_announcement(outcome.metric_label());
        outcome
    }

    async fn try_announce(&self, entry: &ContentEntry) -> AnnounceOutcome {
        let Some(channel) = self.channel else {
            debug!("No notification channel, not announcing {}", entry.id);
            return AnnounceOutcome::Skipped(SkipReason::NoChannel);
        };
        if entry.poster.is_empty() || entry.poster == PLACEHOLDER_POSTER {
            debug!("Entry {} has no poster, not announcing", entry.id);
            return AnnounceOutcome::Skipped(SkipReason::PlaceholderPoster);
        }

        let announcement = build_announcement(entry, self.site_base_url.as_deref());
        let keyboard = announcement
            .button_url
            .as_deref()
            .map(|url| InlineKeyboardMarkup::url_button(WATCH_BUTTON_TEXT, url));

        let sent = match self
            .api
            .send_photo(
                channel,
                &entry.poster,
                &announcement.caption,
                ParseMode::Markdown,
                keyboard.as_ref(),
            )
            .await
        {
            Ok(message) => message,
            Err(e) => {
                warn!("Failed to announce '{}': {}", entry.title, e);
                return AnnounceOutcome::Failed;
            }
        };
        info!("Announced '{}' as message {}", entry.title, sent);

        let mut pinned = false;
        if announcement.pin {
            match self.api.pin_message(channel, sent).await {
                Ok(()) => pinned = true,
                Err(e) => warn!("Failed to pin announcement {}: {}", sent, e),
            }
        }

        AnnounceOutcome::Sent {
            message: sent,
            pinned,
        }
    }
}

pub fn build_announcement(entry: &ContentEntry, site_base_url: Option<&str>) -> Announcement {
    let title = escape_markdown(&entry.title);

    if entry.has_category(CATEGORY_COMING_SOON) {
        return Announcement {
            caption: format!(
                "⏳ **Coming Soon!** ⏳\n\n🎬 **{}**\n\nGet ready! This content will be available on our platform very soon. Stay tuned!",
                title
            ),
            button_url: None,
            pin: false,
        };
    }

    let mut caption = format!("✨ **New Content Added!** ✨\n\n🎬 **{}**\n", title);
    if let Some(year) = entry.release_year() {
        caption.push_str(&format!("🗓️ **Year:** {}\n", year));
    }
    if !entry.genres.is_empty() {
        caption.push_str(&format!(
            "🎭 **Genre:** {}\n",
            escape_markdown(&entry.genres.join(", "))
        ));
    }
    if entry.rating > 0.0 {
        caption.push_str(&format!("⭐ **Rating:** {:.1}/10\n", entry.rating));
    }
    caption.push_str("\n👇 Click the button below to watch or download now!");

    Announcement {
        caption,
        button_url: site_base_url.map(|base| format!("{}/movie/{}", base, entry.id)),
        pin: entry.has_category(CATEGORY_TRENDING),
    }
}
