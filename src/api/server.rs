//! API server lifecycle.
//!
//! Two entry points share the same router:
//! - `serve` runs in the foreground until Ctrl-C (the binary)
//! - `start_api_server_on` spawns a background task and returns a handle
//!   with a shutdown channel: bind → spawn → return handle.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::db::BookingStore;

/// Handle to a server running in a background task.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Later calls do nothing.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind `addr` (port 0 picks an ephemeral port) and serve the API from a
/// background task.
pub async fn start_api_server_on(
    store: Arc<dyn BookingStore>,
    addr: SocketAddr,
) -> std::io::Result<ApiServer> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let app = api_router(store);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Bind `addr` and serve until Ctrl-C, then drain in-flight requests.
pub async fn serve(store: Arc<dyn BookingStore>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Server starting");

    axum::serve(listener, api_router(store))
        .with_graceful_shutdown(ctrl_c())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler the server runs until killed
            tracing::error!("Cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    use crate::db::SqliteStore;

    async fn start() -> ApiServer {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        start_api_server_on(store, SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .expect("server should start")
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start().await;
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/api/v1/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "healthy");

        server.shutdown();
        // Give server time to stop
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn server_serves_api_routes() {
        let mut server = start().await;
        let base = format!("http://{}", server.addr);

        // Unknown route returns 404
        let resp = reqwest::get(format!("{base}/nonexistent")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("{base}/api/v1/appointments"))
            .json(&serde_json::json!({
                "doctor_id": "doc-1",
                "patient_name": "Jeanne Moreau",
                "patient_email": "jeanne@example.com",
                "date_time": "2099-06-01T10:30:00Z",
                "duration_minutes": 45
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

        let listed: serde_json::Value = reqwest::get(format!("{base}/api/v1/appointments"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["duration_minutes"], 45);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start().await;
        let addr = server.addr;
        server.shutdown();
        server.shutdown(); // Second call should be safe

        // The listener closes once the serve task returns.
        for _ in 0..40 {
            if tokio::net::TcpStream::connect(addr).await.is_err() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        panic!("server still accepting connections after shutdown");
    }
}
