//! Grid preview command.
//!
//! Partitions a bounding region into grid cells and prints them without
//! touching the database, so cell sizing can be tuned before a long run.

use clap::Args;
use lodtiles::config::ConfigFile;
use lodtiles::grid::GridPartitioner;
use lodtiles::region::GeodeticRegion;

use crate::error::CliError;

/// Arguments for the grid preview command.
#[derive(Debug, Args)]
pub struct GridArgs {
    /// Western bound in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub west: f64,

    /// Southern bound in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub south: f64,

    /// Eastern bound in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub east: f64,

    /// Northern bound in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub north: f64,

    /// Cell edge length in kilometers (defaults to the configured value)
    #[arg(long)]
    pub cell_edge_km: Option<f64>,
}

/// Run the grid preview command.
pub fn run(args: GridArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let cell_edge_km = args.cell_edge_km.unwrap_or(config.grid.cell_edge_km);

    let partitioner = GridPartitioner::new(cell_edge_km)?;
    let bounds = GeodeticRegion::flat(args.west, args.south, args.east, args.north);
    let cells = partitioner.partition(&bounds)?;

    if cells.is_empty() {
        println!("Region is empty or degenerate; no cells.");
        return Ok(());
    }

    println!(
        "{} cells at {} km edge length:",
        cells.len(),
        cell_edge_km
    );
    println!();
    for cell in &cells {
        println!(
            "  {:<12} lon {:>9.4}..{:<9.4}  lat {:>8.4}..{:<8.4}",
            cell.id(),
            cell.min_lon,
            cell.max_lon,
            cell.min_lat,
            cell.max_lat
        );
    }

    Ok(())
}
