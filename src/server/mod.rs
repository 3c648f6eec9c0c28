//! HTTP server for the catalog API.
//!
//! Provides the following endpoints (under the configured base path):
//! - `GET /items?q=&limit=&page=` - Search and paginate
//! - `GET /items/{id}` - Single item, 404 if absent
//! - `POST /items` - Append an item, 201 with the stored item
//! - `GET /stats` - `{ total, averagePrice }`
//!
//! plus `GET /health` at the root.

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use crate::catalog::Catalog;
use crate::config::HttpConfig;

pub use error::ApiError;
pub use routes::router;

/// Handle returned by [`start`] for shutdown coordination.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    join_handle: std::thread::JoinHandle<()>,
}

impl ServerHandle {
    /// The address actually bound. Differs from the configured one when
    /// port 0 was requested.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signal the server to shut down and wait for it to finish.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.join_handle.join();
    }
}

/// Start the HTTP server in a dedicated thread.
///
/// The socket is bound before this returns, so the server is accepting
/// connections as soon as the caller has the handle. The thread runs its
/// own single-threaded Tokio runtime; store work goes to that runtime's
/// blocking pool.
///
/// # Errors
/// Fails if the address cannot be bound or the runtime cannot be built.
pub fn start(config: &HttpConfig, catalog: Arc<Catalog>) -> std::io::Result<ServerHandle> {
    let listener = std::net::TcpListener::bind(config.address)?;
    listener.set_nonblocking(true)?;
    let local_addr = listener.local_addr()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let app = router(catalog, &config.base_path);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let join_handle = std::thread::Builder::new()
        .name("http".to_string())
        .spawn(move || {
            runtime.block_on(serve(listener, app, shutdown_rx));
        })?;

    Ok(ServerHandle {
        local_addr,
        shutdown_tx,
        join_handle,
    })
}

async fn serve(
    listener: std::net::TcpListener,
    app: Router,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let listener = match tokio::net::TcpListener::from_std(listener) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register listener");
            return;
        }
    };

    if let Ok(address) = listener.local_addr() {
        tracing::info!(address = %address, "Catalog server listening");
    }

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
            tracing::debug!("Catalog server received shutdown signal");
        })
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, "Catalog server error");
    }

    tracing::debug!("Catalog server stopped");
}
