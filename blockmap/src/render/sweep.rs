//! Batch rendering of a rectangular range of tiles.
//!
//! Used to pre-generate tiles ahead of any viewer. Every tile in the range is
//! dispatched at once; the [`RenderLimiter`](super::RenderLimiter) inside the
//! renderer decides how many processes actually run together.
//!
//! # Range quirk
//!
//! The inner (y) loop is bounded by `max.x`, not `max.y`. Existing tile
//! layouts were produced with this bound, so it is kept as-is; see
//! [`sweep_ids`].

use std::path::{Path, PathBuf};

use futures::stream::{FuturesUnordered, StreamExt};
use thiserror::Error;
use tracing::info;

use super::renderer::{RenderOutcome, RenderRequest, TileRenderer};
use crate::coord::{Dimension, TileId};

/// Placeholder replaced by the tile's x coordinate.
pub const PLACEHOLDER_X: &str = "{id.x}";

/// Placeholder replaced by the tile's y coordinate.
pub const PLACEHOLDER_Y: &str = "{id.y}";

/// Largest number of tiles a single sweep may dispatch.
pub const MAX_SWEEP_TILES: usize = 1_000_000;

/// Errors from setting up a sweep.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SweepError {
    #[error("Sweep from {min} to {max} covers {tiles} tiles, more than the limit of {limit}")]
    TooManyTiles {
        min: TileId,
        max: TileId,
        tiles: u128,
        limit: usize,
    },
}

/// Output path pattern with `{id.x}` and `{id.y}` placeholders.
///
/// Any other `{...}` text is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate(String);

impl OutputTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Substitute the placeholders for `id`.
    pub fn resolve(&self, id: TileId) -> PathBuf {
        PathBuf::from(
            self.0
                .replace(PLACEHOLDER_X, &id.x.to_string())
                .replace(PLACEHOLDER_Y, &id.y.to_string()),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OutputTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Tile ids visited by a sweep from `min` to `max`, in dispatch order.
///
/// `x` runs over `min.x..=max.x`. `y` runs over `min.y..=max.x`: the y range
/// is bounded by `max.x`, and `max.y` is never consulted.
// TODO: bound y by `max.y` once stored sweeps no longer rely on the old range.
pub fn sweep_ids(min: TileId, max: TileId) -> Vec<TileId> {
    let mut ids = Vec::new();
    for x in min.x..=max.x {
        for y in min.y..=max.x {
            ids.push(TileId::new(x, y));
        }
    }
    ids
}

/// Totals reported once a sweep has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub rendered: usize,
    pub failed: usize,
}

impl SweepSummary {
    pub fn total(&self) -> usize {
        self.rendered + self.failed
    }
}

/// A batch render of every tile between two ids.
#[derive(Debug, Clone)]
pub struct TileSweep {
    pub output: OutputTemplate,
    pub min: TileId,
    pub max: TileId,
    pub lod: i32,
    pub dimension: Dimension,
}

impl TileSweep {
    /// Number of tiles covered by the range, saturating at `u128::MAX`.
    pub fn tile_count(&self) -> u128 {
        let span = |from: i64, to: i64| (i128::from(to) - i128::from(from) + 1).max(0) as u128;
        let width = span(self.min.x, self.max.x);
        let height = span(self.min.y, self.max.x);
        width.saturating_mul(height)
    }

    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// Number of tiles the sweep will dispatch, if within [`MAX_SWEEP_TILES`].
    pub fn checked_len(&self) -> Result<usize, SweepError> {
        let tiles = self.tile_count();
        match usize::try_from(tiles) {
            Ok(len) if len <= MAX_SWEEP_TILES => Ok(len),
            _ => Err(SweepError::TooManyTiles {
                min: self.min,
                max: self.max,
                tiles,
                limit: MAX_SWEEP_TILES,
            }),
        }
    }

    /// Render every tile, calling `on_tile` as each one completes.
    ///
    /// Completion order is unspecified. The callback runs for failed renders
    /// too; check the file if it matters.
    ///
    /// Fails without rendering anything if the range is larger than
    /// [`MAX_SWEEP_TILES`].
    pub async fn run<F>(
        &self,
        renderer: &dyn TileRenderer,
        mut on_tile: Option<F>,
    ) -> Result<SweepSummary, SweepError>
    where
        F: FnMut(TileId, &Path),
    {
        self.checked_len()?;

        let requests: Vec<RenderRequest> = sweep_ids(self.min, self.max)
            .into_iter()
            .map(|id| RenderRequest::new(self.output.resolve(id), id, self.lod, self.dimension))
            .collect();

        info!(
            tiles = requests.len(),
            lod = self.lod,
            dimension = %self.dimension,
            template = self.output.as_str(),
            "Starting tile sweep"
        );

        let mut pending: FuturesUnordered<_> = requests
            .iter()
            .map(|request| async move { (request, renderer.render(request).await) })
            .collect();

        let mut summary = SweepSummary::default();
        while let Some((request, outcome)) = pending.next().await {
            match outcome {
                RenderOutcome::Success => summary.rendered += 1,
                RenderOutcome::Failure(_) => summary.failed += 1,
            }
            if let Some(callback) = on_tile.as_mut() {
                callback(request.id, &request.output);
            }
        }

        info!(
            rendered = summary.rendered,
            failed = summary.failed,
            "Tile sweep finished"
        );
        Ok(summary)
    }
}
