// Application state module
// Immutable per-process state shared by every connection task

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::error::ServerError;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical served directory, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Validate the root directory and build the shared state
    ///
    /// Fails with `ServerError::Filesystem` when the root is missing, is not a
    /// directory, or cannot be listed.
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let root = resolve_root(Path::new(&config.server.root))?;
        Ok(Self { config, root })
    }
}

fn resolve_root(path: &Path) -> Result<PathBuf, ServerError> {
    let fs_error = |source: io::Error| ServerError::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    let root = path.canonicalize().map_err(fs_error)?;
    if !root.is_dir() {
        return Err(fs_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }
    std::fs::read_dir(&root).map_err(fs_error)?;

    Ok(root)
}
