//! LodTiles - Streamable 3D Tiles from large building datasets
//!
//! This library turns a PostGIS table of geo-referenced building models
//! into a multi-resolution 3D Tiles hierarchy. Datasets are far too large
//! to tile in one pass, so the work is split three ways:
//!
//! - [`grid`] partitions the dataset's bounding region into near-uniform
//!   work cells using a distance-true projection,
//! - an external tiler ([`tiler`]) materializes renderable content for each
//!   cell that actually holds data,
//! - [`merge`] stitches the per-cell tilesets into one quadtree-shaped
//!   hierarchy with aggregated bounding volumes and monotone error budgets.
//!
//! [`pipeline`] sequences the three against the datastore ([`store`]),
//! re-merging progressively so a valid tileset is on disk after every cell.

pub mod config;
pub mod grid;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod region;
pub mod store;
pub mod tiler;
pub mod tileset;
