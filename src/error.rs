//! Startup error taxonomy
//!
//! Everything here is fatal: the process stops before (or instead of) serving.
//! Per-request failures live in `handler::static_files::ServeError`.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Cannot serve directory '{}': {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log files: {0}")]
    Logger(#[source] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}
