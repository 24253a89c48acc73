pub mod app_config;
pub mod endpoint_config;
pub mod error;

pub use app_config::{load_config, parse_args, setup_client};
pub use endpoint_config::EndpointDescriptor;
pub use error::ConfigError;
