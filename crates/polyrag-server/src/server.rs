//! HTTP server that binds an axum Router to a TCP socket.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::HttpTransportError;
use crate::router::{build_router, AppState};

/// Axum-based HTTP server for the polyrag graph API.
pub struct HttpServer {
    pub(crate) addr: SocketAddr,
    pub(crate) state: AppState,
}

impl HttpServer {
    /// Creates a new HTTP server.
    ///
    /// # Errors
    ///
    /// Returns `HttpTransportError::Bind` for an unparseable host.
    pub fn new(state: AppState, host: &str, port: u16) -> Result<Self, HttpTransportError> {
        let ip = host.parse().map_err(|_| HttpTransportError::Bind {
            addr: format!("{host}:{port}"),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid host"),
        })?;
        Ok(Self {
            addr: SocketAddr::new(ip, port),
            state,
        })
    }

    /// Starts the server and blocks until ctrl-c.
    ///
    /// On shutdown the listener stops accepting first, then every
    /// resident engine is finalized via `cleanup` — the pool's
    /// teardown precondition (no concurrent admission traffic) is met
    /// by this sequencing.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP bind fails or the server crashes.
    pub async fn run(self) -> Result<(), HttpTransportError> {
        let listener =
            TcpListener::bind(self.addr)
                .await
                .map_err(|e| HttpTransportError::Bind {
                    addr: self.addr.to_string(),
                    source: e,
                })?;

        tracing::info!(addr = %self.addr, "polyrag HTTP server ready");

        let pool = self.state.pool.clone();
        let router = build_router(self.state);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| HttpTransportError::Serve(e.to_string()))?;

        tracing::info!("server stopped, finalizing resident tenants");
        pool.cleanup().await;
        Ok(())
    }
}

async fn shutdown_signal() {
    // A failed signal registration would leave the server running
    // until killed, which is the right fallback anyway.
    let _ = tokio::signal::ctrl_c().await;
}
