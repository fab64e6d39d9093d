//! Full pipeline run command.
//!
//! Connects to PostGIS, partitions the dataset bounds into grid cells,
//! shells out to the external tiler per cell, and progressively merges the
//! results into one tileset. Settings come from the config file; CLI flags
//! override individual values.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;
use tracing::info;

use lodtiles::config::ConfigFile;
use lodtiles::logging::{default_log_dir, default_log_file, init_logging};
use lodtiles::pipeline::{PipelineConfig, PipelineEvent, RunSummary, TilingPipeline};
use lodtiles::store::PostgisStore;
use lodtiles::tiler::{Pg2B3dmConfig, Pg2B3dmTiler};

use crate::error::CliError;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Name of the dataset table to tile
    pub dataset: String,

    /// Database URL (overrides the configured value)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Output directory (overrides the configured value)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Cell edge length in kilometers (overrides the configured value)
    #[arg(long)]
    pub cell_edge_km: Option<f64>,

    /// Tiler binary (overrides the configured value)
    #[arg(long)]
    pub tiler_binary: Option<PathBuf>,
}

/// Run the full tiling pipeline.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let _guard = init_logging(default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let config = ConfigFile::load().unwrap_or_default();
    let database_url = args.database_url.unwrap_or(config.database.url);
    let output_dir = args.output.unwrap_or(config.output.directory);
    let cell_edge_km = args.cell_edge_km.unwrap_or(config.grid.cell_edge_km);
    let tiler_binary = args.tiler_binary.unwrap_or(config.tiler.binary);

    info!(dataset = %args.dataset, output = %output_dir.display(), "Starting tiling run");

    let runtime = Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;
    let summary = runtime.block_on(async {
        let store = PostgisStore::connect(&database_url)
            .await
            .map_err(CliError::DatabaseConnect)?;

        let mut tiler_config = Pg2B3dmConfig::new(tiler_binary, database_url);
        tiler_config.geometry_column = config.tiler.geometry_column;
        tiler_config.attribute_column = config.tiler.attribute_column;
        let tiler = Pg2B3dmTiler::new(tiler_config).map_err(CliError::TilerSetup)?;

        let pipeline = TilingPipeline::new(
            store,
            tiler,
            PipelineConfig {
                cell_edge_km,
                output_dir,
                merge: config.merge.to_merge_config(),
            },
        )?;

        let progress = ProgressBar::hidden();
        progress.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} cells  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let summary = pipeline
            .run_with_observer(&args.dataset, |event| match event {
                PipelineEvent::Partitioned { cells } => {
                    progress.set_length(cells as u64);
                    progress.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                }
                PipelineEvent::CellStarted { cell, .. } => {
                    progress.set_message(cell.id());
                }
                PipelineEvent::CellEmpty { .. }
                | PipelineEvent::Merged { .. }
                | PipelineEvent::CellFailed { .. } => {
                    progress.inc(1);
                }
            })
            .await?;

        progress.finish_and_clear();
        Ok::<RunSummary, CliError>(summary)
    })?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Tiling run complete:");
    println!("  Cells:     {}", summary.cells_total);
    println!("  Tiled:     {}", summary.cells_tiled);
    println!("  Empty:     {}", summary.cells_empty);
    println!("  Failed:    {}", summary.cells_failed);
    println!("  Leaves:    {}", summary.leaves);
    println!("  Tileset:   {}", summary.output_path.display());
}
