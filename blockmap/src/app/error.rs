//! Application error types.

use std::fmt;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::server::ServerError;
use crate::world::RegistryError;

/// Errors that abort startup or stop the server.
#[derive(Debug)]
pub enum AppError {
    /// Configuration could not be loaded.
    Config(ConfigError),

    /// Tile directory could not be prepared.
    TileStore(CacheError),

    /// Worlds directory could not be scanned.
    Worlds(RegistryError),

    /// World name not present in the registry.
    UnknownWorld(String),

    /// HTTP server failed.
    Server(ServerError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::TileStore(e) => write!(f, "Failed to prepare tile store: {}", e),
            AppError::Worlds(e) => write!(f, "Failed to load worlds: {}", e),
            AppError::UnknownWorld(name) => write!(f, "Unknown world '{}'", name),
            AppError::Server(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::TileStore(e) => Some(e),
            AppError::Worlds(e) => Some(e),
            AppError::UnknownWorld(_) => None,
            AppError::Server(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::TileStore(e)
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Worlds(e)
    }
}

impl From<ServerError> for AppError {
    fn from(e: ServerError) -> Self {
        AppError::Server(e)
    }
}
