//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and builds the Bot API updates the webhook receives.
//!
//! When the update format or routes change, update only this file.

use super::constants::*;
use cinedrop_dispatch_server::server::SECRET_TOKEN_HEADER;
use reqwest::Response;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    secret: Option<String>,
    next_update_id: AtomicI64,
}

impl TestClient {
    /// Creates a client that sends no secret token
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            secret: None,
            next_update_id: AtomicI64::new(1),
        }
    }

    /// Creates a client that sends `secret` with every webhook call
    pub fn with_secret(base_url: String, secret: &str) -> Self {
        let mut client = Self::new(base_url);
        client.secret = Some(secret.to_string());
        client
    }

    fn update_id(&self) -> i64 {
        self.next_update_id.fetch_add(1, Ordering::SeqCst)
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub async fn get_status(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Status request failed")
    }

    // ========================================================================
    // Webhook
    // ========================================================================

    /// Posts a raw body to the webhook
    pub async fn post_raw(&self, body: String) -> Response {
        let mut request = self
            .client
            .post(format!("{}/webhook", self.base_url))
            .header("content-type", "application/json")
            .body(body);
        if let Some(secret) = &self.secret {
            request = request.header(SECRET_TOKEN_HEADER, secret);
        }
        request.send().await.expect("Webhook request failed")
    }

    pub async fn post_update(&self, update: Value) -> Response {
        self.post_raw(update.to_string()).await
    }

    /// A channel post carrying `filename` as a document
    pub async fn post_channel_file(&self, chat: i64, message_id: i64, filename: &str) -> Response {
        let update = json!({
            "update_id": self.update_id(),
            "channel_post": {
                "message_id": message_id,
                "chat": { "id": chat, "type": "channel" },
                "document": { "file_id": format!("file-{}", message_id), "file_name": filename }
            }
        });
        self.post_update(update).await
    }

    /// A private `/start` message, with an optional deep link payload
    pub async fn send_start(&self, chat: i64, payload: Option<&str>) -> Response {
        let text = match payload {
            Some(payload) => format!("/start {}", payload),
            None => "/start".to_string(),
        };
        self.send_text(chat, &text).await
    }

    pub async fn send_text(&self, chat: i64, text: &str) -> Response {
        let update = json!({
            "update_id": self.update_id(),
            "message": {
                "message_id": self.update_id(),
                "chat": { "id": chat, "type": "private" },
                "text": text
            }
        });
        self.post_update(update).await
    }
}

/// Decodes a webhook acknowledgement and returns its `reason`
pub async fn ack_reason(response: Response) -> String {
    let body: Value = response.json().await.expect("Acknowledgement is not JSON");
    body["reason"]
        .as_str()
        .expect("Acknowledgement has no reason")
        .to_string()
}
