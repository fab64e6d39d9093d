//! Configuration management CLI commands.
//!
//! Provides `config init`, `config list`, and `config path` commands for
//! creating and inspecting the configuration file from the command line.

use clap::Subcommand;
use lodtiles::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create the configuration file with default values if missing
    Init,

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

/// Create the configuration file if it does not exist yet.
fn run_init() -> Result<(), CliError> {
    let path = ConfigFile::ensure_exists()?;
    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize LodTiles settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

/// List all configuration settings.
fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    println!("Configuration Settings");
    println!("======================");
    println!();
    println!("[grid]");
    println!("  cell_edge_km = {}", config.grid.cell_edge_km);
    println!();
    println!("[merge]");
    println!(
        "  max_children_per_node = {}",
        config.merge.max_children_per_node
    );
    println!("  min_leaf_error = {}", config.merge.min_leaf_error);
    println!("  max_depth = {}", config.merge.max_depth);
    println!("  root_error_floor = {}", config.merge.root_error_floor);
    println!();
    println!("[database]");
    println!("  url = {}", config.database.url);
    println!();
    println!("[tiler]");
    println!("  binary = {}", config.tiler.binary.display());
    println!("  geometry_column = {}", config.tiler.geometry_column);
    println!("  attribute_column = {}", config.tiler.attribute_column);
    println!();
    println!("[output]");
    println!("  directory = {}", config.output.directory.display());

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}
