//! Renderer backed by the uNmINeD command line tool.
//!
//! Each render runs:
//!
//! ```text
//! unmined-cli image render --world=<world> --output=<file> --zoom=<lod>
//!     --area=<unit>(x,y,dx,dy) --dimension=<id> --background=#000000
//! ```
//!
//! Arguments are passed straight to the process, no shell is involved.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use tokio::process::Command;
use tracing::{debug, warn};

use super::limiter::RenderLimiter;
use super::renderer::{BoxFuture, RenderOutcome, RenderRequest, TileRenderer};
use crate::coord::{tile_area, TileSize};

/// Background colour painted behind unrendered blocks.
pub const BACKGROUND_COLOR: &str = "#000000";

/// Longest stderr excerpt kept in a failure reason.
const MAX_STDERR_CHARS: usize = 512;

/// Renders tiles of one world by invoking uNmINeD.
#[derive(Debug, Clone)]
pub struct UnminedRenderer {
    unmined: PathBuf,
    world: PathBuf,
    tile_size: TileSize,
    limiter: Arc<RenderLimiter>,
}

impl UnminedRenderer {
    /// Create a renderer for the world rooted at `world`.
    ///
    /// # Arguments
    ///
    /// * `unmined` - Path (or bare name on `PATH`) of the uNmINeD executable
    /// * `world` - Root directory of the Minecraft world
    /// * `tile_size` - Footprint of one tile at lod -1
    /// * `limiter` - Render slots shared with every other world
    pub fn new(
        unmined: impl Into<PathBuf>,
        world: impl Into<PathBuf>,
        tile_size: TileSize,
        limiter: Arc<RenderLimiter>,
    ) -> Self {
        Self {
            unmined: unmined.into(),
            world: world.into(),
            tile_size,
            limiter,
        }
    }

    /// Build the argument list for rendering `request`.
    pub fn command_args(&self, request: &RenderRequest) -> Vec<OsString> {
        let area = tile_area(&self.tile_size, request.id, request.lod);

        vec![
            OsString::from("image"),
            OsString::from("render"),
            flag("--world=", &self.world),
            flag("--output=", &request.output),
            OsString::from(format!("--zoom={}", request.lod)),
            OsString::from(format!("--area={}", area)),
            OsString::from(format!("--dimension={}", request.dimension.id())),
            OsString::from(format!("--background={}", BACKGROUND_COLOR)),
        ]
    }

    async fn run(&self, request: &RenderRequest) -> RenderOutcome {
        let _permit = self.limiter.acquire().await;
        let started = Instant::now();

        debug!(
            world = %self.world.display(),
            tile = %request.id,
            lod = request.lod,
            dimension = %request.dimension,
            output = %request.output.display(),
            "Starting render"
        );

        let output = Command::new(&self.unmined)
            .args(self.command_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let outcome = match output {
            Ok(output) if output.status.success() => RenderOutcome::Success,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr: String = stderr.trim().chars().take(MAX_STDERR_CHARS).collect();
                if stderr.is_empty() {
                    RenderOutcome::Failure(format!("uNmINeD exited with {}", output.status))
                } else {
                    RenderOutcome::Failure(format!(
                        "uNmINeD exited with {}: {}",
                        output.status, stderr
                    ))
                }
            }
            Err(e) => RenderOutcome::Failure(format!(
                "failed to run '{}': {}",
                self.unmined.display(),
                e
            )),
        };

        match &outcome {
            RenderOutcome::Success => debug!(
                tile = %request.id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Render finished"
            ),
            RenderOutcome::Failure(reason) => warn!(
                tile = %request.id,
                world = %self.world.display(),
                reason = %reason,
                "Render failed"
            ),
        }

        outcome
    }
}

impl TileRenderer for UnminedRenderer {
    /// Runs the render on its own task.
    ///
    /// Dropping the returned future does not stop the render: the process
    /// keeps its render slot until it exits.
    fn render<'a>(&'a self, request: &'a RenderRequest) -> BoxFuture<'a, RenderOutcome> {
        let renderer = self.clone();
        let request = request.clone();
        let task = tokio::spawn(async move { renderer.run(&request).await });

        Box::pin(async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => RenderOutcome::Failure(format!("render task failed: {}", e)),
            }
        })
    }
}

fn flag(name: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(path.as_os_str());
    arg
}
