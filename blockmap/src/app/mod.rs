//! Application bootstrap.
//!
//! Turns a loaded [`ConfigFile`](crate::config::ConfigFile) into the running
//! pieces: tile store, render limiter and world registry.

mod bootstrap;
mod error;

pub use bootstrap::Bootstrap;
pub use error::AppError;
