//! Tiling pipeline
//!
//! Sequences a full dataset run: dataset bounds → grid partition → per-cell
//! stage/tile/cleanup → progressive hierarchy re-merge. The core steps are
//! pure; everything slow or fallible (datastore queries, the external
//! tiler) happens between merge calls, and every successful merge leaves a
//! complete, valid tileset on disk. Aborting mid-run therefore loses work
//! but never correctness.

mod types;

pub use types::{PipelineError, PipelineEvent, RunSummary};

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::grid::GridPartitioner;
use crate::merge::{HierarchyMerger, LeafDescriptor, MergeConfig};
use crate::store::DatasetStore;
use crate::tiler::CellTiler;

/// Merged tileset filename within the output directory.
pub const TILESET_FILENAME: &str = "tileset.json";

/// Pipeline-level configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Grid cell edge length in kilometers
    pub cell_edge_km: f64,
    /// Directory receiving per-cell content and the merged tileset
    pub output_dir: PathBuf,
    /// Hierarchy construction tuning
    pub merge: MergeConfig,
}

/// Drives one dataset from geometry store to merged tileset.
pub struct TilingPipeline<S, T> {
    store: S,
    tiler: T,
    partitioner: GridPartitioner,
    merger: HierarchyMerger,
    output_dir: PathBuf,
}

impl<S: DatasetStore, T: CellTiler> TilingPipeline<S, T> {
    /// Creates a pipeline over the given collaborators.
    pub fn new(store: S, tiler: T, config: PipelineConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            store,
            tiler,
            partitioner: GridPartitioner::new(config.cell_edge_km)?,
            merger: HierarchyMerger::new(config.merge),
            output_dir: config.output_dir,
        })
    }

    /// Runs the full pipeline for `dataset`.
    pub async fn run(&self, dataset: &str) -> Result<RunSummary, PipelineError> {
        self.run_with_observer(dataset, |_| {}).await
    }

    /// Runs the full pipeline, reporting progress through `observer`.
    ///
    /// Per-cell tiler failures are logged and skipped so one broken cell
    /// cannot sink a long run; merge/serialization failures abort, since
    /// without a writable output the run has nothing to show.
    pub async fn run_with_observer(
        &self,
        dataset: &str,
        mut observer: impl FnMut(PipelineEvent),
    ) -> Result<RunSummary, PipelineError> {
        let output_path = self.output_dir.join(TILESET_FILENAME);
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(PipelineError::OutputDir)?;

        let Some(bounds) = self.store.dataset_bounds(dataset).await? else {
            warn!(dataset, "Dataset is empty; writing empty tileset");
            self.merger.merge(&output_path, &[])?;
            return Ok(RunSummary::empty(output_path));
        };

        let cells = self.partitioner.partition(&bounds)?;
        info!(dataset, cells = cells.len(), "Partitioned dataset bounds");
        observer(PipelineEvent::Partitioned { cells: cells.len() });

        let mut summary = RunSummary::empty(output_path.clone());
        summary.cells_total = cells.len();
        let mut leaves: Vec<LeafDescriptor> = Vec::new();

        for (index, cell) in cells.iter().enumerate() {
            observer(PipelineEvent::CellStarted {
                index,
                total: cells.len(),
                cell: *cell,
            });

            let Some(table) = self.store.stage_cell(dataset, cell).await? else {
                summary.cells_empty += 1;
                observer(PipelineEvent::CellEmpty { cell: *cell });
                continue;
            };

            let materialized = self
                .tiler
                .materialize_cell(cell, &table, &self.output_dir)
                .await;

            // The working table is disposable either way
            if let Err(e) = self.store.drop_cell(&table).await {
                warn!(table, error = %e, "Failed to drop cell working table");
            }

            match materialized {
                Ok(Some(leaf)) => {
                    leaves.push(leaf);
                    summary.cells_tiled += 1;
                    // Progressive re-merge: after every new leaf the tileset
                    // on disk is complete for the leaves seen so far
                    self.merger.merge(&output_path, &leaves)?;
                    observer(PipelineEvent::Merged {
                        cell: *cell,
                        leaves: leaves.len(),
                    });
                }
                Ok(None) => {
                    summary.cells_empty += 1;
                    observer(PipelineEvent::CellEmpty { cell: *cell });
                }
                Err(e) => {
                    error!(cell = %cell.id(), error = %e, "Tiler failed; skipping cell");
                    summary.cells_failed += 1;
                    observer(PipelineEvent::CellFailed {
                        cell: *cell,
                        error: e.to_string(),
                    });
                }
            }
        }

        if leaves.is_empty() {
            warn!(dataset, "No cell produced content; writing empty tileset");
            self.merger.merge(&output_path, &[])?;
        }

        summary.leaves = leaves.len();
        info!(
            dataset,
            tiled = summary.cells_tiled,
            empty = summary.cells_empty,
            failed = summary.cells_failed,
            "Pipeline run complete"
        );
        Ok(summary)
    }
}
