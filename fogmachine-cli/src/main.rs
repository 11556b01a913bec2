//! FogMachine CLI - Command-line interface
//!
//! Computes viewsheds over SRTM elevation tiles, optionally spreading the
//! sweep over simulated peers.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::tiles::TilesCommands;
use commands::viewshed::ViewshedArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "fogmachine")]
#[command(version = fogmachine::VERSION)]
#[command(about = "Distributed viewshed analysis over SRTM elevation tiles", long_about = None)]
struct Cli {
    /// Enable debug logging (also mirrors log events to stdout)
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file [default: ~/.fogmachine/config.ini]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the viewshed of an observer
    Viewshed(ViewshedArgs),

    /// Inspect elevation tiles
    #[command(subcommand)]
    Tiles(TilesCommands),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        e.exit();
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config(command) => commands::config::run(command, cli.config.as_deref()),
        Commands::Viewshed(args) => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.debug)?;
            commands::viewshed::run(args, &runner)
        }
        Commands::Tiles(command) => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.debug)?;
            commands::tiles::run(command, &runner)
        }
    }
}
