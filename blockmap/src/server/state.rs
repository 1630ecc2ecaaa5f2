//! Shared state handed to every request handler.

use serde_json::Value;

use crate::cache::TileStore;
use crate::world::WorldRegistry;

/// Everything the handlers read. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Worlds that can be rendered.
    pub registry: WorldRegistry,
    /// On-disk tile cache.
    pub store: TileStore,
    /// Configuration tree served by `/config/<path>`.
    pub config: Value,
}

impl AppState {
    pub fn new(registry: WorldRegistry, store: TileStore, config: Value) -> Self {
        Self {
            registry,
            store,
            config,
        }
    }
}
