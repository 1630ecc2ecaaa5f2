//! Sweep command - pre-render a range of tiles.

use std::path::{Path, PathBuf};

use blockmap::app::Bootstrap;
use blockmap::coord::{Dimension, TileId, DEFAULT_LOD};
use blockmap::render::{OutputTemplate, TileSweep};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the sweep command.
pub struct SweepArgs {
    pub config: PathBuf,
    pub world: String,
    pub output: Option<String>,
    pub min: TileId,
    pub max: TileId,
    pub lod: i32,
    pub dimension: Dimension,
}

/// Template writing into the server's tile cache for `world`.
pub fn cache_template(tiles_world_dir: &Path) -> OutputTemplate {
    OutputTemplate::new(
        tiles_world_dir
            .join("{id.x} {id.y}.png")
            .to_string_lossy()
            .into_owned(),
    )
}

/// Run the sweep command.
pub fn run(args: SweepArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(&args.config, false)?;
    runner.log_startup("sweep");
    let config = runner.config();

    let boot = Bootstrap::start(config, false)?;
    let renderer = boot.renderer(&args.world)?;

    let into_cache = args.output.is_none();
    let output = match args.output {
        Some(template) => OutputTemplate::new(template),
        None => cache_template(&boot.store.world_dir(&args.world)),
    };

    if into_cache && (args.lod != DEFAULT_LOD || args.dimension != Dimension::Overworld) {
        // Cache paths carry no lod or dimension, so the server would serve these as-is.
        warn!(
            lod = args.lod,
            dimension = %args.dimension,
            "Sweeping into the tile cache with non-default lod or dimension"
        );
        println!(
            "Warning: tiles rendered at lod {} ({}) will replace the server's cached tiles.",
            args.lod, args.dimension
        );
    }

    let sweep = TileSweep {
        output,
        min: args.min,
        max: args.max,
        lod: args.lod,
        dimension: args.dimension,
    };
    let tiles = sweep.checked_len()?;

    println!("Sweeping world '{}'", args.world);
    println!("  Tiles:     {}", tiles);
    println!("  Output:    {}", sweep.output.as_str());
    println!("  Lod:       {}", sweep.lod);
    println!("  Dimension: {}", sweep.dimension);
    println!();

    let progress = ProgressBar::new(tiles as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let runtime = runner.runtime()?;
    let summary = runtime.block_on(async {
        if into_cache {
            boot.store
                .ensure_world_dir(&args.world)
                .await
                .map_err(|e| CliError::App(e.into()))?;
        }

        let summary = sweep
            .run(
                renderer.as_ref(),
                Some(|id: TileId, _: &Path| {
                    progress.set_message(id.to_string());
                    progress.inc(1);
                }),
            )
            .await?;
        Ok::<_, CliError>(summary)
    })?;
    progress.finish_and_clear();

    println!(
        "Sweep finished: {} rendered, {} failed",
        summary.rendered, summary.failed
    );
    Ok(())
}
