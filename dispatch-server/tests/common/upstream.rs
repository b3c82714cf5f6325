//! Fake upstream HTTP services (TMDB, Bot API)
//!
//! Serves an arbitrary axum router on a random local port so the real
//! reqwest-based clients can be pointed at it.

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub struct FakeUpstream {
    /// Base URL of the fake (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
    shutdown: CancellationToken,
}

impl FakeUpstream {
    pub async fn spawn(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let shutdown = CancellationToken::new();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            shutdown,
        }
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
