//! Web server for filedrop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::store::FileStore;
use crate::{FiledropError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// HTTP server wrapping the router and its listen address.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    upload_dir: PathBuf,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, store: Arc<dyn FileStore>) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| FiledropError::Config(format!("invalid listen address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(store, config)),
            upload_dir: PathBuf::from(&config.storage.upload_dir),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state, &self.upload_dir);

        let listener = TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = create_router(self.app_state, &self.upload_dir);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
