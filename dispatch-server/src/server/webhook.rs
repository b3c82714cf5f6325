//! Telegram webhook endpoint.
//!
//! Every update is acknowledged with 200 so Telegram never redelivers it; the
//! `reason` field says what was done with it.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::state::ServerState;
use crate::telegram::{Message, Update};

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
    pub reason: &'static str,
}

fn ack(reason: &'static str) -> Response {
    (StatusCode::OK, Json(WebhookAck { status: "ok", reason })).into_response()
}

pub async fn handle_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = &state.config.webhook_secret {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            warn!("Rejected webhook call with a missing or wrong secret token");
            return (
                StatusCode::UNAUTHORIZED,
                Json(WebhookAck {
                    status: "error",
                    reason: "unauthorized",
                }),
            )
                .into_response();
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Undecodable update: {}", e);
            return ack("malformed_update");
        }
    };
    debug!("Update {}", update.update_id);

    if let Some(post) = update.channel_post {
        return ack(handle_channel_post(&state, &post).await);
    }
    if let Some(message) = update.message {
        return ack(handle_message(&state, &message).await);
    }
    ack("ignored")
}

async fn handle_channel_post(state: &ServerState, post: &Message) -> &'static str {
    if post.chat.id != state.config.source_channel {
        debug!("Ignoring post from chat {}", post.chat.id);
        return "ignored_chat";
    }
    let Some(filename) = post.attached_file_name() else {
        return "no_file";
    };

    match state.ingestion.ingest(filename, post.message_ref()).await {
        Ok(report) if report.created => "created",
        Ok(_) => "merged",
        Err(_) => "skipped",
    }
}

async fn handle_message(state: &ServerState, message: &Message) -> &'static str {
    let Some(text) = message.text.as_deref() else {
        return "ignored";
    };
    let mut words = text.split_whitespace();
    let is_start = words
        .next()
        .map(|command| command == "/start" || command.starts_with("/start@"))
        .unwrap_or(false);
    if !is_start {
        return "ignored";
    }

    state
        .retrieval
        .handle_start(message.chat.id, words.next())
        .await
        .as_str()
}
