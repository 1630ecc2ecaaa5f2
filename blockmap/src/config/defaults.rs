//! Default configuration values.

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// HTTP listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Directory holding one subdirectory per world.
pub const DEFAULT_WORLDS_DIR: &str = "worlds";

/// Root of the tile cache.
pub const DEFAULT_TILES_DIR: &str = "tiles";

/// uNmINeD executable, looked up on `PATH` unless a path is given.
pub const DEFAULT_UNMINED: &str = "unmined-cli";

/// Log directory, relative to the config file.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log file name.
pub const DEFAULT_LOG_FILE: &str = "blockmap.log";
