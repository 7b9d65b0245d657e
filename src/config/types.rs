// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind; `0.0.0.0` listens on all IPv4 interfaces
    pub host: String,
    pub port: u16,
    /// Directory whose contents are served
    pub root: String,
    /// Tokio worker threads (CPU cores when unset)
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            root: "frontend".to_string(),
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: true,
            access_log_format: "common".to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound on a connection's lifetime in seconds; unbounded when unset
    pub connection_timeout: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            connection_timeout: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    /// Product named in the startup banner
    pub site_name: String,
    /// Render an HTML index for directories without an index file
    pub directory_listing: bool,
    /// Index files tried in order when a directory is requested
    pub index_files: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: concat!("cors-static-server/", env!("CARGO_PKG_VERSION")).to_string(),
            site_name: "Hyperbridge Token Bridge".to_string(),
            directory_listing: true,
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }
}
