//! Startup sequence shared by the `serve` and `sweep` commands.
//!
//! 1. Optionally wipe the tile cache (`deleteStoredTilesOnStart`)
//! 2. Make sure the tile root exists
//! 3. Create the render limiter
//! 4. Scan the worlds directory into a [`WorldRegistry`]

use std::sync::Arc;

use tracing::info;

use super::error::AppError;
use crate::cache::TileStore;
use crate::config::ConfigFile;
use crate::render::{default_concurrent_renders, RenderLimiter, TileRenderer};
use crate::server::AppState;
use crate::world::WorldRegistry;

/// Components built from the configuration.
#[derive(Debug)]
pub struct Bootstrap {
    pub registry: WorldRegistry,
    pub store: TileStore,
    pub limiter: Arc<RenderLimiter>,
}

impl Bootstrap {
    /// Prepare the tile store and load every world.
    ///
    /// `clear_tiles` is honoured only by the server; a sweep never wipes the
    /// cache it is filling.
    pub fn start(config: &ConfigFile, clear_tiles: bool) -> Result<Self, AppError> {
        let settings = config.settings();
        let image = &settings.image_generation;

        let store = TileStore::new(config.tiles_dir());
        if clear_tiles && image.delete_stored_tiles_on_start {
            store.clear()?;
        } else {
            store.ensure_root()?;
        }

        let max_concurrent = image
            .max_concurrent_renders
            .unwrap_or_else(default_concurrent_renders);
        let limiter = Arc::new(RenderLimiter::new(max_concurrent));

        let registry = WorldRegistry::load(
            &config.worlds_dir(),
            &image.unmined,
            image.tile_size,
            Arc::clone(&limiter),
        )?;

        info!(
            tiles = %store.root().display(),
            unmined = %image.unmined.display(),
            tile_size = ?image.tile_size,
            "Bootstrap complete"
        );

        Ok(Self {
            registry,
            store,
            limiter,
        })
    }

    /// Renderer for `world`, or [`AppError::UnknownWorld`].
    pub fn renderer(&self, world: &str) -> Result<Arc<dyn TileRenderer>, AppError> {
        self.registry
            .get(world)
            .cloned()
            .ok_or_else(|| AppError::UnknownWorld(world.to_string()))
    }

    /// Turn the components into request handler state.
    pub fn into_state(self, config: &ConfigFile) -> AppState {
        AppState::new(self.registry, self.store, config.tree().clone())
    }
}
