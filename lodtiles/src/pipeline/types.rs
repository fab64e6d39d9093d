//! Pipeline types and errors

use std::path::PathBuf;

use thiserror::Error;

use crate::grid::{GridCell, GridError};
use crate::merge::MergeError;
use crate::store::StoreError;

/// Errors that abort a pipeline run.
///
/// Per-cell tiler failures are deliberately absent: they are logged and
/// counted in [`RunSummary::cells_failed`] instead of aborting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Grid partitioning failed
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Datastore interaction failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Merging or writing the output tileset failed
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Output directory could not be created
    #[error("Failed to create output directory: {0}")]
    OutputDir(std::io::Error),
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Bounds were partitioned into this many cells
    Partitioned { cells: usize },
    /// Work on one cell began
    CellStarted {
        index: usize,
        total: usize,
        cell: GridCell,
    },
    /// The cell intersected no rows or produced no content
    CellEmpty { cell: GridCell },
    /// The cell's leaf was folded into the tileset on disk
    Merged { cell: GridCell, leaves: usize },
    /// The tiler failed on this cell; the run continues
    CellFailed { cell: GridCell, error: String },
}

/// Outcome counts for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cells produced by the partitioner
    pub cells_total: usize,
    /// Cells with no intersecting rows or no tiler output
    pub cells_empty: usize,
    /// Cells successfully tiled and merged
    pub cells_tiled: usize,
    /// Cells skipped after a tiler failure
    pub cells_failed: usize,
    /// Leaf tilesets referenced by the merged hierarchy
    pub leaves: usize,
    /// Path of the merged tileset
    pub output_path: PathBuf,
}

impl RunSummary {
    /// A zeroed summary pointing at `output_path`.
    pub fn empty(output_path: PathBuf) -> Self {
        Self {
            cells_total: 0,
            cells_empty: 0,
            cells_tiled: 0,
            cells_failed: 0,
            leaves: 0,
            output_path,
        }
    }
}
