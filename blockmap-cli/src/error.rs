//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use blockmap::app::AppError;
use blockmap::config::ConfigError;
use blockmap::render::SweepError;
use blockmap::server::ServerError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the Tokio runtime
    Runtime(String),
    /// Startup or server failure
    App(AppError),
    /// Sweep range rejected before rendering
    Sweep(SweepError),
}

impl CliError {
    /// Exit the process with an error message and status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::App(AppError::Config(ConfigError::Read { .. })) => {
                eprintln!();
                eprintln!("Create a config.toml next to your worlds directory, or pass --config.");
            }
            CliError::App(AppError::Server(ServerError::Bind { .. })) => {
                eprintln!();
                eprintln!("Is another server already using this port? Try --port.");
            }
            CliError::App(AppError::UnknownWorld(_)) => {
                eprintln!();
                eprintln!("World names are the directory names inside the worlds directory.");
            }
            CliError::Sweep(SweepError::TooManyTiles { .. }) => {
                eprintln!();
                eprintln!("Split the range into smaller sweeps. Note that max-x also bounds y.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Sweep(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::App(e) => Some(e),
            CliError::Sweep(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::App(AppError::Config(e))
    }
}

impl From<SweepError> for CliError {
    fn from(e: SweepError) -> Self {
        CliError::Sweep(e)
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        CliError::App(AppError::Server(e))
    }
}
