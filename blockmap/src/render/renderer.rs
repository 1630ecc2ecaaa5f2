//! The `TileRenderer` trait and the outcome of a render.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::coord::{Dimension, TileId};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Everything a renderer needs to produce one tile image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// File the image is written to.
    pub output: PathBuf,
    pub id: TileId,
    pub lod: i32,
    pub dimension: Dimension,
}

impl RenderRequest {
    pub fn new(output: impl Into<PathBuf>, id: TileId, lod: i32, dimension: Dimension) -> Self {
        Self {
            output: output.into(),
            id,
            lod,
            dimension,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// How a render process ended.
///
/// Callers are not required to act on a failure: the tile endpoint logs it
/// and serves whatever is (or is not) on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The process exited with a success status.
    Success,
    /// The process could not be started or exited unsuccessfully.
    Failure(String),
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderOutcome::Success)
    }
}

impl fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderOutcome::Success => write!(f, "success"),
            RenderOutcome::Failure(reason) => write!(f, "failure: {}", reason),
        }
    }
}

/// Produces tile images for a single world.
///
/// Implementations must be `Send + Sync` so one renderer can serve many
/// concurrent requests. The returned future resolves once the image has been
/// written (or the attempt has ended); it never errors.
///
/// # Implementors
///
/// - [`super::UnminedRenderer`] - runs the uNmINeD command line tool
pub trait TileRenderer: Send + Sync {
    /// Render the tile described by `request`.
    fn render<'a>(&'a self, request: &'a RenderRequest) -> BoxFuture<'a, RenderOutcome>;
}
