//! Copies a resolved message to the requesting user and schedules its removal.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::handle::SchedulerHandle;
use super::job::DeliveryJob;
use crate::content_store::MessageRef;
use crate::deep_link::ResolvedTarget;
use crate::server::metrics;
use crate::telegram::{escape_markdown_v2, escape_markdown_v2_url, ChatId, MessagingApi, ParseMode};

pub const COPY_FAILED_TEXT: &str = "Error sending file. It might have been deleted from the channel.";

/// Promotional links appended to every delivery caption.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLinks {
    pub bot_username: String,
    pub main_channel: Option<String>,
    pub update_channel: Option<String>,
    pub developer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    /// The copy reached the user. `job` is absent if scheduling its deletion failed.
    Delivered {
        copy: MessageRef,
        job: Option<DeliveryJob>,
    },
    CopyFailed,
}

pub struct DeliveryService {
    api: Arc<dyn MessagingApi>,
    source_channel: ChatId,
    retention: Duration,
    links: DeliveryLinks,
    scheduler: SchedulerHandle,
}

impl DeliveryService {
    pub fn new(
        api: Arc<dyn MessagingApi>,
        source_channel: ChatId,
        retention: Duration,
        links: DeliveryLinks,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            api,
            source_channel,
            retention,
            links,
            scheduler,
        }
    }

    pub async fn deliver(&self, chat: ChatId, target: &ResolvedTarget) -> DeliveryOutcome {
        let caption = build_caption(&target.entry.title, &target.descriptor, &self.links);

        let copy = match self
            .api
            .copy_message(
                chat,
                self.source_channel,
                target.message,
                &caption,
                ParseMode::MarkdownV2,
            )
            .await
        {
            Ok(copy) => copy,
            Err(e) => {
                warn!(
                    "Failed to copy message {} to chat {}: {}",
                    target.message, chat, e
                );
                metrics::record_delivery("copy_failed");
                if let Err(e) = self.api.send_text(chat, COPY_FAILED_TEXT, None).await {
                    warn!("Failed to notify chat {}: {}", chat, e);
                }
                return DeliveryOutcome::CopyFailed;
            }
        };
        info!(
            "Delivered '{}' {} to chat {}",
            target.entry.title, target.descriptor, chat
        );
        metrics::record_delivery("delivered");

        let job = DeliveryJob::new(chat, copy, self.retention);
        let job = match self.scheduler.schedule(job.clone()).await {
            Ok(_) => Some(job),
            Err(e) => {
                error!("Could not schedule deletion of {}: {}", job.job_key, e);
                None
            }
        };

        DeliveryOutcome::Delivered { copy, job }
    }
}

/// MarkdownV2 caption for a delivered file.
pub fn build_caption(title: &str, descriptor: &str, links: &DeliveryLinks) -> String {
    let mut sections = vec![
        format!(
            "🎬 *{}* {}",
            escape_markdown_v2(title),
            escape_markdown_v2(descriptor)
        ),
        "✅ *Successfully Sent To Your PM*".to_string(),
    ];

    let bot = escape_markdown_v2(&links.bot_username);
    if let Some(link) = &links.main_channel {
        sections.push(format!(
            "🔰 Join Our Main Channel\n➡️ [{} Main]({})",
            bot,
            escape_markdown_v2_url(link)
        ));
    }
    if let Some(link) = &links.update_channel {
        sections.push(format!(
            "📢 Join Our Update Channel\n➡️ [{} Official]({})",
            bot,
            escape_markdown_v2_url(link)
        ));
    }
    if let Some(link) = &links.developer {
        sections.push(format!(
            "💬 For Any Help or Request\n➡️ [Contact Developer]({})",
            escape_markdown_v2_url(link)
        ));
    }

    sections.join("\n\n")
}
