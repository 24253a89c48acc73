use std::collections::HashMap;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use url::Url;

use super::error::ConfigError;

/// A single endpoint record as it appears in the input file.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Optional human readable label, only used in diagnostics.
    #[serde(default)]
    pub name: Option<String>,

    /// The URL of the endpoint to probe.
    pub url: String,

    /// The HTTP method used for the probe.
    /// Defaults to GET if not specified.
    #[serde(default = "default_method")]
    pub method: String,

    /// Extra request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Raw request body, sent as-is.
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// The list of endpoint records, in the order they were configured.
pub type Config = Vec<EndpointConfig>;

/// A validated endpoint, ready to be probed.
///
/// Built once at startup from an [`EndpointConfig`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    pub name: Option<String>,
    pub url: Url,
    /// The URL exactly as configured, used for display.
    pub raw_url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    domain: String,
}

impl EndpointDescriptor {
    /// Validates the record at `index` (1-based, used in error messages).
    pub fn from_config(index: usize, config: EndpointConfig) -> Result<Self, ConfigError> {
        let invalid_url = |reason: String| ConfigError::InvalidUrl {
            index,
            url: config.url.clone(),
            reason,
        };

        let url = Url::parse(&config.url).map_err(|e| invalid_url(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid_url(format!("unsupported scheme '{}'", url.scheme())));
        }
        let domain = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
            _ => return Err(invalid_url("missing host".to_string())),
        };

        let method = Method::from_bytes(config.method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigError::InvalidMethod {
                index,
                method: config.method.clone(),
            })?;

        let mut headers = HeaderMap::with_capacity(config.headers.len());
        for (name, value) in &config.headers {
            let invalid_header = || ConfigError::InvalidHeader {
                index,
                header: name.clone(),
            };
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid_header())?;
            let header_value = HeaderValue::from_str(value).map_err(|_| invalid_header())?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            name: config.name,
            url,
            raw_url: config.url,
            method,
            headers,
            body: config.body,
            domain,
        })
    }

    /// The aggregation key: the URL's host.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Label used in diagnostics, the configured name or else the URL.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.raw_url)
    }
}
