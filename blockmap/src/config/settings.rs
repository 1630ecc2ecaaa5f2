//! Typed configuration sections.
//!
//! Keys are camelCase in the file because the same tree is handed to the
//! browser client through `/config/<path>`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::coord::TileSize;

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub port: u16,
    pub worlds_directory: PathBuf,
    pub tiles_directory: PathBuf,
    pub image_generation: ImageGenerationSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            worlds_directory: PathBuf::from(DEFAULT_WORLDS_DIR),
            tiles_directory: PathBuf::from(DEFAULT_TILES_DIR),
            image_generation: ImageGenerationSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// `[imageGeneration]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageGenerationSettings {
    /// uNmINeD executable.
    pub unmined: PathBuf,
    /// Tile footprint at lod -1.
    pub tile_size: TileSize,
    /// Wipe the tile cache before serving.
    pub delete_stored_tiles_on_start: bool,
    /// Render processes allowed at once; `None` uses the CPU count.
    pub max_concurrent_renders: Option<usize>,
}

impl Default for ImageGenerationSettings {
    fn default() -> Self {
        Self {
            unmined: PathBuf::from(DEFAULT_UNMINED),
            tile_size: TileSize::default(),
            delete_stored_tiles_on_start: false,
            max_concurrent_renders: None,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
