//! Registry of renderable worlds.
//!
//! Built once at startup from the worlds directory: every subdirectory is a
//! world, named after the directory. The registry is immutable afterwards; a
//! world added on disk while the server runs is not picked up.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::coord::TileSize;
use crate::render::{RenderLimiter, TileRenderer, UnminedRenderer};

/// Errors from scanning the worlds directory.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read worlds directory {}: {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },
}

/// A world directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldDir {
    pub name: String,
    pub path: PathBuf,
}

/// List the world directories under `worlds_dir`, sorted by name.
///
/// Plain files are skipped, as are directories whose names are not valid UTF-8.
pub fn scan_worlds(worlds_dir: &Path) -> Result<Vec<WorldDir>, RegistryError> {
    let read_err = |source: io::Error| RegistryError::ReadDir {
        path: worlds_dir.to_path_buf(),
        source,
    };

    let mut worlds = Vec::new();
    for entry in std::fs::read_dir(worlds_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        // Follows symlinks, so a linked world directory counts.
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => worlds.push(WorldDir { name, path }),
            Err(raw) => warn!(name = ?raw, "Skipping world with non UTF-8 name"),
        }
    }

    worlds.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(worlds)
}

/// Immutable mapping from world name to the renderer for that world.
#[derive(Clone, Default)]
pub struct WorldRegistry {
    worlds: BTreeMap<String, Arc<dyn TileRenderer>>,
}

impl WorldRegistry {
    /// Scan `worlds_dir` and create a uNmINeD renderer for every world.
    ///
    /// All renderers share `limiter`.
    pub fn load(
        worlds_dir: &Path,
        unmined: &Path,
        tile_size: TileSize,
        limiter: Arc<RenderLimiter>,
    ) -> Result<Self, RegistryError> {
        let worlds = scan_worlds(worlds_dir)?;

        let registry = Self::from_renderers(worlds.into_iter().map(|world| {
            let renderer: Arc<dyn TileRenderer> = Arc::new(UnminedRenderer::new(
                unmined,
                world.path,
                tile_size,
                Arc::clone(&limiter),
            ));
            (world.name, renderer)
        }));

        info!(
            directory = %worlds_dir.display(),
            worlds = registry.len(),
            "Loaded worlds"
        );
        Ok(registry)
    }

    /// Build a registry from explicit `(name, renderer)` pairs.
    pub fn from_renderers<I>(renderers: I) -> Self
    where
        I: IntoIterator<Item = (String, Arc<dyn TileRenderer>)>,
    {
        Self {
            worlds: renderers.into_iter().collect(),
        }
    }

    /// Renderer for `world`, if registered.
    pub fn get(&self, world: &str) -> Option<&Arc<dyn TileRenderer>> {
        self.worlds.get(world)
    }

    pub fn contains(&self, world: &str) -> bool {
        self.worlds.contains_key(world)
    }

    /// Registered world names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.worlds.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

impl fmt::Debug for WorldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldRegistry")
            .field("worlds", &self.worlds.keys().collect::<Vec<_>>())
            .finish()
    }
}
