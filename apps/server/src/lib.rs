//! # Billing Mock API Server
//!
//! Serves the static billing collections over HTTP with `Axum`, documents them with a
//! generated `OpenAPI` reference, and loads the JSONL data in the background.
//!
//! ## Example
//! ```no_run
//! use billmock_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

pub mod router;

use anyhow::{Context, Result};
use axum_server::Handle;
use billmock_kernel::domain::config::{ApiConfig, DataConfig};
use billmock_kernel::loader::LoadError;
use billmock_kernel::server::AppState;
use billmock_kernel::store::RecordStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
    store: Option<RecordStore>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Directory holding the four JSONL files.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.data.dir = dir.into();
        self
    }

    /// Serves from an existing store instead of a fresh one.
    pub fn store(mut self, store: RecordStore) -> Self {
        self.store = Some(store);
        self
    }

    fn validate_ssl_config(&self) -> Result<()> {
        if let Some(ssl) = &self.cfg.server.ssl {
            if !ssl.cert.exists() {
                anyhow::bail!("SSL certificate not found at: {}", ssl.cert.display());
            }
            if !ssl.key.exists() {
                anyhow::bail!("SSL key not found at: {}", ssl.key.display());
            }
        }
        Ok(())
    }

    /// Consumes the builder and assembles the application state.
    ///
    /// Data is not read here; [`Server::run`] loads it in the background.
    ///
    /// # Errors
    /// Returns an error if a configured TLS certificate or key file is missing.
    pub fn build(self) -> Result<Server> {
        self.validate_ssl_config()?;

        if !self.cfg.data.dir.is_dir() {
            warn!(dir = %self.cfg.data.dir.display(), "Data directory does not exist");
        }

        let mut state = AppState::builder().config(self.cfg);
        if let Some(store) = self.store {
            state = state.store(store);
        }
        let state = state.build().context("Failed to assemble application state")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Loads the data, binds the listener and serves until a shutdown signal arrives.
    ///
    /// Loading runs as a background task. Unless `data.wait_for_load` is set, requests
    /// are accepted immediately and see empty collections until their file is loaded.
    ///
    /// # Errors
    /// Returns an error if binding fails, TLS setup fails, or (with `wait_for_load`)
    /// the data cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);

        let store = self.state.store.clone();
        let mut loading = spawn_data_load(store.clone(), cfg.data.clone());
        if cfg.data.wait_for_load {
            info!("Waiting for data before accepting connections");
            tokio::select! {
                () = store.wait_ready() => {}
                res = &mut loading => {
                    res.context("Data loading task failed")?.context("Failed to load data")?;
                }
            }
        }

        let app = router::init(self.state)?;

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        if let Some(ssl_config) = &cfg.server.ssl {
            info!("Server running on https://{address}");
            info!("API reference available at https://{address}{}", router::DOCS_PATH);

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                &ssl_config.cert,
                &ssl_config.key,
            )
            .await
            .context("Failed to load SSL/TLS certificates")?;

            axum_server::bind_rustls(address, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTPS server failed")?;
        } else {
            info!("Server running on http://{address}");
            info!("API reference available at http://{address}{}", router::DOCS_PATH);

            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .context("HTTP server failed")?;
        }

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Loads every collection on a background task, logging the outcome.
///
/// Requests are never blocked by this task; a failure leaves the affected collections
/// empty and the store not ready.
pub fn spawn_data_load(store: RecordStore, data: DataConfig) -> JoinHandle<Result<(), LoadError>> {
    tokio::spawn(async move {
        let result = store.load_all(&data).await;
        if let Err(e) = &result {
            error!(
                error = %e,
                path = %e.path().display(),
                line = e.line(),
                "Failed to load data; affected collections stay empty"
            );
        }
        result
    })
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
