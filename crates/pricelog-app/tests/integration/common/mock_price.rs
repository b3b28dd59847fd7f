//! Mock price endpoint for integration tests.
//!
//! Serves `GET /price/v2` with a configurable status and body and records
//! the query parameters of every request.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct Shared {
    response: Arc<Mutex<(u16, String)>>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// A mock price endpoint for testing.
pub struct MockPriceServer {
    addr: SocketAddr,
    shared: Shared,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockPriceServer {
    /// Start a server on an available port answering with `status` and `body`.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let shared = Shared::default();
        *shared.response.lock().unwrap() = (status, body.into());

        let app = Router::new()
            .route("/price/v2", get(handle_price))
            .with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shared,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Endpoint URL to put in `AppConfig::price_url`.
    pub fn url(&self) -> String {
        format!("http://{}/price/v2", self.addr)
    }

    /// Change the canned response.
    pub fn respond_with(&self, status: u16, body: impl Into<String>) {
        *self.shared.response.lock().unwrap() = (status, body.into());
    }

    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Shutdown the server.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_price(
    State(shared): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    shared.requests.lock().unwrap().push(params);
    let (status, body) = shared.response.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap(), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockPriceServer::start(200, "{}").await;
        assert!(server.url().starts_with("http://127.0.0.1:"));
        server.shutdown();
    }
}
