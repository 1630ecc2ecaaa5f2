//! blockmap - map tiles for Minecraft worlds
//!
//! Serves a pan/zoom map of Minecraft worlds. Tiles are rendered on demand
//! by the uNmINeD command line tool and kept on disk.

pub mod app;
pub mod cache;
pub mod config;
pub mod coord;
pub mod logging;
pub mod render;
pub mod server;
pub mod world;

/// Crate version, reported at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
