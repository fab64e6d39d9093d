//! LodTiles CLI - Command-line interface
//!
//! This binary provides a command-line interface to the LodTiles library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use crate::commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "lodtiles")]
#[command(about = "Tile large building datasets into a merged 3D Tiles hierarchy", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full tiling pipeline against a PostGIS dataset
    Run(commands::run::RunArgs),

    /// Preview the grid cells a bounding region partitions into
    Grid(commands::grid::GridArgs),

    /// Merge existing per-cell tilesets into one hierarchy
    Merge(commands::merge::MergeArgs),

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Grid(args) => commands::grid::run(args),
        Commands::Merge(args) => commands::merge::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
