use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;

use super::endpoint_config::{Config, EndpointDescriptor};
use super::error::{ConfigError, UsageError};

/// Fixed per-request timeout for every probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("availcheck/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub endpoints: Vec<EndpointDescriptor>,
}

/// Extract the endpoint file path from the process arguments.
/// Exactly one argument after the program name is accepted.
pub fn parse_args<I>(args: I) -> Result<PathBuf, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let program = args.next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    match (args.next(), args.next()) {
        (Some(path), None) => Ok(PathBuf::from(path)),
        _ => Err(UsageError { program }),
    }
}

/// Load and validate the endpoint file.
/// The file is a YAML sequence of endpoint records; every record is turned into an
/// [`EndpointDescriptor`] or the whole load fails. Partially valid files are never returned.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = serde_yaml::from_str(&config_str).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if config.is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    let endpoints = config
        .into_iter()
        .enumerate()
        .map(|(i, record)| EndpointDescriptor::from_config(i + 1, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AppConfig {
        config_path: path.to_path_buf(),
        endpoints,
    })
}

/// Setup the HTTP client shared by all probes.
/// Certificates are validated, so TLS failures count as a DOWN probe.
pub fn setup_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(PROBE_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}
