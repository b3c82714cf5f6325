use anyhow::{Context, Result};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::metrics::metrics_handler;
use super::webhook::handle_webhook;
use super::{log_requests, state::*};
use crate::delivery::SchedulerHandle;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub content_entries: usize,
    pub pending_deletions: Option<usize>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(
    State(state): State<ServerState>,
    State(content_store): State<GuardedContentStore>,
    State(scheduler): State<SchedulerHandle>,
) -> impl IntoResponse {
    let pending_deletions = match scheduler.pending_jobs().await {
        Ok(jobs) => Some(jobs.len()),
        Err(e) => {
            warn!("Could not query deletion scheduler: {}", e);
            None
        }
    };

    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        content_entries: content_store.get_entries_count(),
        pending_deletions,
    };
    Json(stats)
}

pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/webhook", post(handle_webhook))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve the webhook app and the metrics app until `shutdown` is cancelled.
pub async fn run_server(state: ServerState, shutdown: CancellationToken) -> Result<()> {
    let port = state.config.port;
    let metrics_port = state.config.metrics_port;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    let metrics_shutdown = shutdown.clone();
    let metrics_server = tokio::spawn(async move {
        axum::serve(metrics_listener, make_metrics_app())
            .with_graceful_shutdown(async move { metrics_shutdown.cancelled().await })
            .await
    });

    axum::serve(listener, make_app(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    metrics_server.await??;
    Ok(())
}
