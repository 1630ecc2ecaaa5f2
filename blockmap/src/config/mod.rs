//! Server configuration.
//!
//! Read once at startup from a TOML file:
//!
//! ```toml
//! port = 3000
//! worldsDirectory = "worlds"
//! tilesDirectory = "tiles"
//!
//! [imageGeneration]
//! unmined = "unmined-cli"
//! deleteStoredTilesOnStart = false
//!
//! [imageGeneration.tileSize]
//! x = 16
//! y = 16
//! unit = "c"
//! ```

mod defaults;
mod file;
mod settings;

pub use defaults::*;
pub use file::{lookup, ConfigError, ConfigFile};
pub use settings::{ImageGenerationSettings, LoggingSettings, Settings};
