//! Standalone merge command.
//!
//! Rebuilds the top-level hierarchy from per-cell tilesets already on disk,
//! e.g. after tuning merge settings or hand-pruning cells, without
//! re-running the tiler.

use std::path::PathBuf;

use clap::Args;
use lodtiles::config::ConfigFile;
use lodtiles::merge::{HierarchyMerger, LeafDescriptor};
use lodtiles::pipeline::TILESET_FILENAME;

use crate::error::CliError;

/// Arguments for the merge command.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Directory holding one subdirectory with a tileset.json per cell
    pub directory: PathBuf,

    /// Output path for the merged tileset (defaults to tileset.json inside
    /// the input directory)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Run the merge command.
pub fn run(args: MergeArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let output_path = args
        .output
        .unwrap_or_else(|| args.directory.join(TILESET_FILENAME));

    let leaves = collect_leaves(&args.directory)?;
    if leaves.is_empty() {
        println!(
            "No per-cell tilesets found under {}.",
            args.directory.display()
        );
    }

    let merger = HierarchyMerger::new(config.merge.to_merge_config());
    let merged = merger.merge(&output_path, &leaves)?;

    println!(
        "Merged {} leaf tilesets into {}",
        merged.root.leaf_count(),
        output_path.display()
    );
    Ok(())
}

/// Collect leaf descriptors from every `<cell>/tileset.json` under `dir`.
fn collect_leaves(dir: &PathBuf) -> Result<Vec<LeafDescriptor>, CliError> {
    let read_dir = std::fs::read_dir(dir).map_err(|error| CliError::InputDir {
        path: dir.display().to_string(),
        error,
    })?;

    let mut leaves = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|error| CliError::InputDir {
            path: dir.display().to_string(),
            error,
        })?;
        let candidate = entry.path().join(TILESET_FILENAME);
        if entry.path().is_dir() && candidate.is_file() {
            // One unreadable cell must not sink the whole merge
            match LeafDescriptor::from_tileset_file(&candidate, dir) {
                Ok(leaf) => leaves.push(leaf),
                Err(e) => {
                    eprintln!(
                        "Warning: skipping malformed cell tileset {}: {}",
                        candidate.display(),
                        e
                    );
                }
            }
        }
    }
    Ok(leaves)
}
