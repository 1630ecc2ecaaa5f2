//! Filesystem tile cache.
//!
//! A tile is cached when its PNG exists at the canonical path
//! `{root}/{world}/{x} {y}.png`. There is no index, TTL or eviction: files
//! stay until something outside the server deletes them, or the store is
//! cleared at startup.
//!
//! The path depends on the world and tile id only. Renders of the same id at
//! another lod or dimension overwrite the same file.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::coord::TileId;

/// File extension of cached tiles.
pub const TILE_EXTENSION: &str = "png";

/// Errors from managing the tile directory tree.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create tile directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to clear tile directory {}: {source}", .path.display())]
    Clear { path: PathBuf, source: io::Error },
}

/// Path-addressed store of rendered tiles.
#[derive(Debug, Clone)]
pub struct TileStore {
    root: PathBuf,
}

impl TileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every tile of `world`.
    pub fn world_dir(&self, world: &str) -> PathBuf {
        self.root.join(world)
    }

    /// Canonical file of tile `id` in `world`.
    pub fn tile_path(&self, world: &str, id: TileId) -> PathBuf {
        self.world_dir(world)
            .join(format!("{} {}.{}", id.x, id.y, TILE_EXTENSION))
    }

    /// Create the world's tile directory (and parents) if missing.
    pub async fn ensure_world_dir(&self, world: &str) -> Result<PathBuf, CacheError> {
        let dir = self.world_dir(world);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        Ok(dir)
    }

    /// Whether tile `id` of `world` has been rendered.
    pub async fn contains(&self, world: &str, id: TileId) -> bool {
        tokio::fs::try_exists(self.tile_path(world, id))
            .await
            .unwrap_or(false)
    }

    /// Create the root directory if it does not exist.
    pub fn ensure_root(&self) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root).map_err(|source| CacheError::CreateDir {
            path: self.root.clone(),
            source,
        })
    }

    /// Delete every stored tile and recreate an empty root.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(CacheError::Clear {
                    path: self.root.clone(),
                    source,
                })
            }
        }
        self.ensure_root()?;

        info!(root = %self.root.display(), "Cleared stored tiles");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_tile_path_layout() {
        let store = TileStore::new("/srv/tiles");
        assert_eq!(
            store.tile_path("survival", TileId::new(-3, 12)),
            PathBuf::from("/srv/tiles/survival/-3 12.png")
        );
    }

    #[test]
    fn test_tile_path_is_deterministic() {
        let store = TileStore::new("tiles");
        let id = TileId::new(5, -5);
        assert_eq!(store.tile_path("w", id), store.tile_path("w", id));
        assert_ne!(store.tile_path("w", id), store.tile_path("other", id));
    }

    #[tokio::test]
    async fn test_ensure_world_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("a").join("tiles"));

        let dir = store.ensure_world_dir("survival").await.unwrap();

        assert!(dir.is_dir());
        assert_eq!(dir, store.world_dir("survival"));
        // Second call on an existing directory is fine.
        store.ensure_world_dir("survival").await.unwrap();
    }

    #[tokio::test]
    async fn test_contains_tracks_file_existence() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path());
        let id = TileId::new(1, 2);

        assert!(!store.contains("w", id).await);

        store.ensure_world_dir("w").await.unwrap();
        std::fs::write(store.tile_path("w", id), b"png").unwrap();

        assert!(store.contains("w", id).await);
    }

    #[test]
    fn test_clear_removes_tiles_and_recreates_root() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("tiles"));
        std::fs::create_dir_all(store.world_dir("w")).unwrap();
        std::fs::write(store.tile_path("w", TileId::new(0, 0)), b"png").unwrap();

        store.clear().unwrap();

        assert!(store.root().is_dir());
        assert!(!store.world_dir("w").exists());
    }

    #[test]
    fn test_clear_missing_root() {
        let temp = TempDir::new().unwrap();
        let store = TileStore::new(temp.path().join("never-created"));

        store.clear().unwrap();

        assert!(store.root().is_dir());
    }
}
