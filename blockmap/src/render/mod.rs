//! Tile rendering.
//!
//! Rendering is delegated to an external process. This module builds the
//! command, bounds how many run at once and reports how each one ended.
//!
//! - [`TileRenderer`] - dyn-compatible renderer interface
//! - [`UnminedRenderer`] - runs the uNmINeD CLI for one world
//! - [`RenderLimiter`] - semaphore shared by every renderer
//! - [`TileSweep`] - batch render of a tile range

mod limiter;
mod renderer;
mod sweep;
mod unmined;

pub use limiter::{default_concurrent_renders, RenderLimiter, RenderPermit};
pub use renderer::{BoxFuture, RenderOutcome, RenderRequest, TileRenderer};
pub use sweep::{
    sweep_ids, OutputTemplate, SweepError, SweepSummary, TileSweep, MAX_SWEEP_TILES,
};
pub use unmined::{UnminedRenderer, BACKGROUND_COLOR};
