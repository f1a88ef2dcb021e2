use billmock_domain::error::format_context;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

/// Default config file stem, resolved as `billmock.toml` in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "billmock";
/// Prefix of structured environment overrides (`BILLMOCK__SERVER__PORT`).
pub const ENV_PREFIX: &str = "BILLMOCK";
/// Plain port variable honoured on top of everything else.
pub const PORT_ENV: &str = "PORT";

const PORT_KEY: &str = "server.port";

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid port `{value}`{}: {source}", format_context(.context))]
    InvalidPort { value: String, source: ParseIntError, context: Option<Cow<'static, str>> },
}

pub trait ConfigErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError>;
}

impl<T> ConfigErrorExt<T> for Result<T, config::ConfigError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, ConfigError> {
        self.map_err(|source| ConfigError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

/// Loads configuration from a file layered with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **Defaults** of `T` (its `serde(default)` impls).
/// 2. **File**: `path`, or `billmock.toml` when `None`. An explicit path must exist;
///    the default file is optional.
/// 3. **Environment**: variables prefixed with `BILLMOCK__`, nested with double
///    underscores (`BILLMOCK__DATA__DIR` maps to `data.dir`).
/// 4. **`PORT`**: overrides `server.port`.
///
/// # Errors
/// Returns an error if an explicit file is missing, a source is malformed, `PORT` is not
/// a valid port number, or the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use billmock_kernel::config::load_config;
/// use billmock_kernel::domain::config::ApiConfig;
///
/// let cfg: ApiConfig = load_config(None::<&str>).unwrap_or_default();
/// assert!(cfg.server.port > 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    build_config(&effective_path, required, std::env::var(PORT_ENV).ok())
}

fn build_config<T>(path: &Path, required: bool, port: Option<String>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let port = port.map(|value| parse_port(&value)).transpose()?;

    let builder = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake)
                .try_parsing(true),
        )
        .set_override_option(PORT_KEY, port.map(i64::from))
        .context("Failed to apply PORT override")?;

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|source| ConfigError::InvalidPort {
        value: value.to_owned(),
        source,
        context: Some(format!("{PORT_ENV} environment variable").into()),
    })
}
