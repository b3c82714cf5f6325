pub mod config;
mod http_layers;
pub mod metrics;
pub mod server;
pub mod state;
mod webhook;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, make_metrics_app, run_server};
pub use state::ServerState;
pub use webhook::{WebhookAck, SECRET_TOKEN_HEADER};
