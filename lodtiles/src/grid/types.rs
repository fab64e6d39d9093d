//! Grid cell type definitions

use thiserror::Error;

use crate::region::GeodeticRegion;

/// One bounded spatial work unit of the partition raster.
///
/// `grid_x`/`grid_y` are zero-based indices into the raster and are a
/// deterministic function of position, so re-partitioning the same bounds
/// with the same edge length names the same cells. They key the cell's
/// working table and output directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Western bound in degrees
    pub min_lon: f64,
    /// Southern bound in degrees
    pub min_lat: f64,
    /// Eastern bound in degrees
    pub max_lon: f64,
    /// Northern bound in degrees
    pub max_lat: f64,
    /// Zero-based column index (west to east)
    pub grid_x: u32,
    /// Zero-based row index (south to north)
    pub grid_y: u32,
}

impl GridCell {
    /// Stable identifier for work tables and output directories.
    #[inline]
    pub fn id(&self) -> String {
        format!("cell_{}_{}", self.grid_x, self.grid_y)
    }

    /// The cell's geodetic envelope with a zero height range.
    #[inline]
    pub fn envelope(&self) -> GeodeticRegion {
        GeodeticRegion::flat(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

/// Errors that can occur during grid partitioning.
#[derive(Debug, Error)]
pub enum GridError {
    /// Cell edge length must be strictly positive
    #[error("Invalid cell edge length: {0} km (must be > 0)")]
    InvalidCellEdge(f64),

    /// Projection setup or point transform failed
    #[error("Projection error: {0}")]
    Projection(#[from] proj4rs::errors::Error),
}
