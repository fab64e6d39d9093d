//! External tiler abstraction
//!
//! Turning one staged cell table into renderable tile content is the job of
//! an external tiler binary. The pipeline sees only the single capability
//! [`CellTiler::materialize_cell`]; which binary runs, and with what
//! arguments, is an implementation detail of the backend ([`Pg2B3dmTiler`]
//! in production, fakes in tests).

mod pg2b3dm;

pub use pg2b3dm::{Pg2B3dmConfig, Pg2B3dmTiler};

use std::future::Future;
use std::path::Path;

use thiserror::Error;

use crate::grid::GridCell;
use crate::merge::{LeafDescriptor, MergeError};

/// Errors that can occur while materializing a cell.
#[derive(Debug, Error)]
pub enum TilerError {
    /// Could not launch or talk to the tiler process
    #[error("Failed to run tiler '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// Tiler ran but reported failure
    #[error("Tiler exited with {status}: {stderr}")]
    TilerFailed { status: String, stderr: String },

    /// Output directory could not be prepared
    #[error("Failed to prepare output directory: {0}")]
    OutputDir(#[from] std::io::Error),

    /// Tiler produced a descriptor the merger cannot accept
    #[error(transparent)]
    Descriptor(#[from] MergeError),

    /// Database URL could not be decomposed into tiler arguments
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
}

/// The single abstract capability the pipeline needs from a tiler.
pub trait CellTiler: Send + Sync {
    /// Converts the staged rows in `table` into tile content under
    /// `output_dir/<cell id>/`.
    ///
    /// Returns a [`LeafDescriptor`] pointing at the produced per-cell
    /// tileset, or `None` when the tiler completed without producing one
    /// (the cell then contributes nothing to the hierarchy).
    fn materialize_cell(
        &self,
        cell: &GridCell,
        table: &str,
        output_dir: &Path,
    ) -> impl Future<Output = Result<Option<LeafDescriptor>, TilerError>> + Send;
}
