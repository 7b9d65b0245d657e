// Configuration module entry point
// Loads the startup configuration; nothing here changes after the server is bound

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Default config file, looked up without extension in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` (optional) and `SERVER_*` environment variables
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Missing file and missing variables fall back to the built-in defaults,
    /// which serve `./frontend` on port 8000.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Configuration serving `root` with every other value at its default
    pub fn for_root(root: impl Into<String>) -> Self {
        let mut cfg = Self::default();
        cfg.server.root = root.into();
        cfg
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ServerError::InvalidAddress {
            reason: e.to_string(),
            addr,
        })
    }
}
