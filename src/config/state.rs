// Application state module
// Immutable per-server state shared by every connection task

use super::ServerConfig;
use crate::error::ServerError;
use std::path::PathBuf;

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    /// Canonical form of `config.root`, the containment boundary for every request
    pub root: PathBuf,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let root = std::fs::canonicalize(&config.root).map_err(|source| ServerError::Root {
            path: config.root.clone(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServerError::Root {
                path: config.root,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(Self { config, root })
    }
}
