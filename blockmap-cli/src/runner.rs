//! CLI runner for common setup.
//!
//! Loads the configuration, initializes logging and builds the Tokio runtime
//! so command handlers don't repeat it.

use std::path::Path;

use blockmap::config::ConfigFile;
use blockmap::logging::{init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the log writer alive while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load `config_path` and start logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - TOML configuration file
    /// * `stdout_logging` - Mirror log lines to stdout (off while a progress bar is drawn)
    pub fn new(config_path: &Path, stdout_logging: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let logging = &config.settings().logging;
        let logging_guard = init_logging(&config.log_dir(), &logging.file, stdout_logging)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("blockmap v{}", blockmap::VERSION);
        info!("blockmap CLI: {} command", command);
    }

    /// Build the multi-threaded runtime that drives renders and the server.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
