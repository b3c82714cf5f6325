//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, USER_CHAT};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_welcome() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.send_start(USER_CHAT, None).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod doubles;
mod server;
mod upstream;

// Public API - this is what tests import
pub use client::{ack_reason, TestClient};
pub use constants::*;
pub use doubles::TelegramCall;
pub use server::TestServer;
pub use upstream::FakeUpstream;
