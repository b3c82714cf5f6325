use crate::content_store::MessageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoChannel,
    PlaceholderPoster,
}

/// What happened to one announcement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceOutcome {
    Sent { message: MessageRef, pinned: bool },
    Skipped(SkipReason),
    Failed,
}

impl AnnounceOutcome {
    pub fn metric_label(&self) -> &'static str {
        match self {
            AnnounceOutcome::Sent { .. } => "sent",
            AnnounceOutcome::Skipped(_) => "skipped",
            AnnounceOutcome::Failed => "failed",
        }
    }
}

/// Photo caption plus optional call-to-action button.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub caption: String,
    pub button_url: Option<String>,
    pub pin: bool,
}
