use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

use crate::content_store::MessageRef;
use crate::telegram::ChatId;

/// Stable identity of a deletion job: one per delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey(String);

impl JobKey {
    pub fn new(chat: ChatId, message: MessageRef) -> Self {
        JobKey(format!("del_{}_{}", chat, message))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deferred removal of a message delivered to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryJob {
    pub chat: ChatId,
    pub delivered_message: MessageRef,
    pub fire_at: DateTime<Utc>,
    pub job_key: JobKey,
}

impl DeliveryJob {
    pub fn new(chat: ChatId, delivered_message: MessageRef, retention: Duration) -> Self {
        Self {
            chat,
            delivered_message,
            fire_at: Utc::now() + chrono::Duration::seconds(retention.as_secs() as i64),
            job_key: JobKey::new(chat, delivered_message),
        }
    }

    /// Time left until `fire_at`, zero when already due.
    pub fn remaining(&self) -> Duration {
        (self.fire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}
