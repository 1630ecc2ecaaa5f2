//! Loading `config.toml`.
//!
//! The file is read once at startup and kept in two forms: typed
//! [`Settings`] for the server itself and a JSON tree for `/config/<path>`
//! lookups.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use super::settings::Settings;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has the wrong shape
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {key} = '{value}' - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Config tree could not be converted to JSON
    #[error("Failed to convert config to JSON: {0}")]
    Tree(#[from] serde_json::Error),
}

/// Loaded configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    base_dir: PathBuf,
    settings: Settings,
    tree: Value,
}

impl ConfigFile {
    /// Load configuration from `path`.
    ///
    /// Relative directories in the file are resolved against the file's own
    /// directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self::parse(&content, base_dir)
    }

    /// Parse configuration text, resolving relative paths against `base_dir`.
    pub fn parse(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        let tree = serde_json::to_value(&table)?;
        let settings: Settings = toml::Value::Table(table).try_into()?;
        validate(&settings)?;

        Ok(Self {
            base_dir: base_dir.into(),
            settings,
            tree,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configuration exactly as written, as JSON.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Walk the configuration tree along `key_path`.
    ///
    /// Segments are separated by `/` or `.`; array elements are addressed by
    /// index. Returns `Value::Null` if any segment is missing.
    pub fn lookup(&self, key_path: &str) -> Value {
        lookup(&self.tree, key_path)
    }

    pub fn worlds_dir(&self) -> PathBuf {
        self.resolve(&self.settings.worlds_directory)
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.resolve(&self.settings.tiles_directory)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.settings.logging.directory)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Walk `tree` along a `/`- or `.`-separated key path.
pub fn lookup(tree: &Value, key_path: &str) -> Value {
    let mut current = tree;
    for segment in key_path.split(['/', '.']).filter(|s| !s.is_empty()) {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Value::Null,
        }
    }
    current.clone()
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let image = &settings.image_generation;

    if image.max_concurrent_renders == Some(0) {
        return Err(ConfigError::InvalidValue {
            key: "imageGeneration.maxConcurrentRenders".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    for (axis, value) in [("x", image.tile_size.x), ("y", image.tile_size.y)] {
        if !value.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: format!("imageGeneration.tileSize.{}", axis),
                value: value.to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
    }

    if settings.logging.file.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "logging.file".to_string(),
            value: settings.logging.file.clone(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}
