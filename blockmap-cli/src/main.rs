//! blockmap CLI - serve and pre-render Minecraft map tiles.

mod commands;
mod error;
mod runner;

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use blockmap::config::DEFAULT_CONFIG_FILE;
use blockmap::coord::{Dimension, TileId, DEFAULT_LOD};
use clap::{Args, Parser, Subcommand};

use commands::{serve, sweep};

#[derive(Parser)]
#[command(name = "blockmap")]
#[command(version, about = "Map tile server for Minecraft worlds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the map viewer and tile server (default)
    Serve(ServeCommand),

    /// Pre-render a rectangular range of tiles
    Sweep(SweepCommand),
}

#[derive(Args)]
struct ServeCommand {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Address to listen on
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Port to listen on (overrides `port` in the config file)
    #[arg(long)]
    port: Option<u16>,
}

impl Default for ServeCommand {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: None,
        }
    }
}

#[derive(Args)]
struct SweepCommand {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// World to render (a directory name in the worlds directory)
    #[arg(long)]
    world: String,

    /// Output path template using {id.x} and {id.y}; defaults to the tile cache
    #[arg(long)]
    output: Option<String>,

    /// Smallest tile x
    #[arg(long, allow_negative_numbers = true)]
    min_x: i64,

    /// Smallest tile y
    #[arg(long, allow_negative_numbers = true)]
    min_y: i64,

    /// Largest tile x (also bounds tile y, see the docs of `sweep_ids`)
    #[arg(long, allow_negative_numbers = true)]
    max_x: i64,

    /// Largest tile y
    #[arg(long, allow_negative_numbers = true)]
    max_y: i64,

    /// Level of detail passed to uNmINeD as --zoom
    #[arg(long, default_value_t = DEFAULT_LOD, allow_negative_numbers = true)]
    lod: i32,

    /// Dimension to render: overworld, nether or end (or its id: 0, -1, 1)
    #[arg(long, default_value = "overworld", allow_negative_numbers = true)]
    dimension: Dimension,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Serve(ServeCommand::default())) {
        Commands::Serve(cmd) => serve::run(serve::ServeArgs {
            config: cmd.config,
            host: cmd.host,
            port: cmd.port,
        }),
        Commands::Sweep(cmd) => sweep::run(sweep::SweepArgs {
            config: cmd.config,
            world: cmd.world,
            output: cmd.output,
            min: TileId::new(cmd.min_x, cmd.min_y),
            max: TileId::new(cmd.max_x, cmd.max_y),
            lod: cmd.lod,
            dimension: cmd.dimension,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
