use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the endpoint file. Any of these stops the process
/// before the first cycle.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no endpoints configured in {}", path.display())]
    Empty { path: PathBuf },

    #[error("endpoint #{index}: invalid url '{url}': {reason}")]
    InvalidUrl {
        index: usize,
        url: String,
        reason: String,
    },

    #[error("endpoint #{index}: invalid HTTP method '{method}'")]
    InvalidMethod { index: usize, method: String },

    #[error("endpoint #{index}: invalid header '{header}'")]
    InvalidHeader { index: usize, header: String },
}

/// Wrong number of command line arguments.
#[derive(Debug, Error)]
#[error("Usage: {program} \"<input_file_path>\"")]
pub struct UsageError {
    pub program: String,
}
