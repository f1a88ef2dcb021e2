use anyhow::Context;
use billmock_kernel::config::{DEFAULT_CONFIG_FILE, load_config};
use billmock_kernel::domain::config::ApiConfig;
use billmock_logger::Logger;
use billmock_server::Server;
use std::path::PathBuf;
use tracing::info;

/// Overrides the config file location (defaults to `billmock.toml`).
const CONFIG_PATH_ENV: &str = "BILLMOCK_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let cfg: ApiConfig =
        load_config(config_path.as_ref()).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME")).env_filter(&cfg.log.level);
    if let Some(directory) = &cfg.log.directory {
        logger = logger.path(directory).json(cfg.log.json);
    }
    let _log = logger.init()?;

    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!(file = DEFAULT_CONFIG_FILE, "Configuration loaded (file optional)"),
    }

    Server::builder().config(cfg).build()?.run().await
}
