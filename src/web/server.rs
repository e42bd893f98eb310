//! Web server for chatrelay.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::{RelayError, Result};

use super::router::{create_router, create_static_router};
use super::ws::RelayWsState;

/// HTTP/WebSocket server for the relay.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Relay state shared by every connection.
    state: Arc<RelayWsState>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
    /// Browser client directory, if served.
    static_path: Option<String>,
}

impl WebServer {
    /// Create a new web server from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                RelayError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.server.host, config.server.port
                ))
            })?;

        Ok(Self {
            addr,
            state: Arc::new(RelayWsState::from_config(&config.relay)),
            cors_origins: config.server.cors_origins.clone(),
            static_path: config
                .server
                .serve_static
                .then(|| config.server.static_path.clone()),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the relay state.
    pub fn state(&self) -> &Arc<RelayWsState> {
        &self.state
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router)> {
        let topology = self.state.router.topology();
        let mut router = create_router(self.state, &self.cors_origins);

        if let Some(static_path) = &self.static_path {
            if let Some(static_router) = create_static_router(static_path) {
                router = router.merge(static_router);
                tracing::info!("Serving browser client from {}", static_path);
            }
        }

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!(
            topology = %topology,
            "Relay listening on ws://{}/ws",
            listener.local_addr()?
        );
        Ok((listener, router))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server in the background and return the bound address.
    ///
    /// Useful for tests binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
