use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Cinedrop metrics
const PREFIX: &str = "cinedrop";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Ingestion Metrics
    pub static ref INGESTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_ingestions_total"), "Channel posts processed, by outcome"),
        &["outcome"]
    ).expect("Failed to create ingestions_total metric");

    pub static ref ENTRIES_CREATED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_entries_created_total"), "Content entries created"),
        &["source"]
    ).expect("Failed to create entries_created_total metric");

    pub static ref CONTENT_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_content_entries"),
        "Content entries in the store at startup"
    ).expect("Failed to create content_entries metric");

    pub static ref METADATA_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_metadata_lookups_total"), "External catalog lookups"),
        &["result"]
    ).expect("Failed to create metadata_lookups_total metric");

    pub static ref ANNOUNCEMENTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_announcements_total"), "New content announcements"),
        &["outcome"]
    ).expect("Failed to create announcements_total metric");

    // Delivery Metrics
    pub static ref DELIVERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_deliveries_total"), "Files delivered to users"),
        &["outcome"]
    ).expect("Failed to create deliveries_total metric");

    pub static ref DELETIONS_FIRED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_deletions_fired_total"), "Scheduled deletions executed"),
        &["outcome"]
    ).expect("Failed to create deletions_fired_total metric");

    pub static ref PENDING_DELETIONS: Gauge = Gauge::new(
        format!("{PREFIX}_pending_deletions"),
        "Deletion jobs waiting to fire"
    ).expect("Failed to create pending_deletions metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(INGESTIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ENTRIES_CREATED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CONTENT_ENTRIES.clone()));
    let _ = REGISTRY.register(Box::new(METADATA_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ANNOUNCEMENTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DELIVERIES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DELETIONS_FIRED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PENDING_DELETIONS.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_content_metrics(num_entries: usize) {
    CONTENT_ENTRIES.set(num_entries as f64);
    tracing::info!("Content metrics initialized: {} entries", num_entries);
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_ingestion(outcome: &str) {
    INGESTIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// `source` is "catalog" or "shell".
pub fn record_entry_created(source: &str) {
    ENTRIES_CREATED_TOTAL.with_label_values(&[source]).inc();
}

pub fn record_metadata_lookup(result: &str) {
    METADATA_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_announcement(outcome: &str) {
    ANNOUNCEMENTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_delivery(outcome: &str) {
    DELIVERIES_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_deletion_fired(outcome: &str) {
    DELETIONS_FIRED_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn set_pending_deletions(count: usize) {
    PENDING_DELETIONS.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
