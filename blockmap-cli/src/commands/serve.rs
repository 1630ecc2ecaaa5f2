//! Serve command - run the map viewer and tile server.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use blockmap::app::Bootstrap;
use blockmap::server;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub config: PathBuf,
    pub host: IpAddr,
    pub port: Option<u16>,
}

/// Run the serve command.
pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(&args.config, true)?;
    runner.log_startup("serve");
    let config = runner.config();

    let port = args.port.unwrap_or(config.settings().port);
    let addr = SocketAddr::new(args.host, port);

    let boot = Bootstrap::start(config, true)?;
    if boot.registry.is_empty() {
        warn!(
            directory = %config.worlds_dir().display(),
            "No worlds found; every tile request will be rejected"
        );
    }

    println!("blockmap v{}", blockmap::VERSION);
    println!("==============");
    println!();
    println!("Worlds:  {}", boot.registry.names().join(", "));
    let tile_size = config.settings().image_generation.tile_size;
    let (block_x, block_y) = tile_size.blocks();
    println!("Tiles:   {}", boot.store.root().display());
    println!(
        "Tile:    {}x{} {} ({}x{} blocks)",
        tile_size.x, tile_size.y, tile_size.unit, block_x, block_y
    );
    println!("Renders: up to {} at once", boot.limiter.max_concurrent());
    println!("Viewer:  http://{}", addr);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = Arc::new(boot.into_state(config));
    let runtime = runner.runtime()?;
    runtime.block_on(server::serve(addr, state, shutdown_signal()))?;

    println!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
