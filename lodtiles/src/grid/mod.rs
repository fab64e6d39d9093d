//! Grid partitioning
//!
//! Divides a dataset's geodetic bounding region into near-uniform work
//! cells. The split happens in a distance-true planar projection
//! (EPSG:25832) so that cells stay ~`cell_edge_km` on a side regardless of
//! latitude, then each cell's corners are projected back to geodetic
//! degrees for the datastore envelope queries.
//!
//! The partitioner is data-blind: it rasterizes the bounding rectangle and
//! nothing else. Cells that contain no actual rows are expected and are
//! filtered by the pipeline, which can ask the datastore.

mod projection;
mod types;

pub use projection::RegionalProjection;
pub use types::{GridCell, GridError};

use tracing::{debug, warn};

use crate::region::GeodeticRegion;

/// Partitions geodetic bounding regions into equal-area grid cells.
pub struct GridPartitioner {
    projection: RegionalProjection,
    cell_edge_km: f64,
}

impl GridPartitioner {
    /// Creates a partitioner with the given cell edge length in kilometers.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidCellEdge`] for non-positive or non-finite
    /// edge lengths, or a projection error if the fixed CRS pair cannot be
    /// constructed.
    pub fn new(cell_edge_km: f64) -> Result<Self, GridError> {
        if !cell_edge_km.is_finite() || cell_edge_km <= 0.0 {
            return Err(GridError::InvalidCellEdge(cell_edge_km));
        }
        Ok(Self {
            projection: RegionalProjection::new()?,
            cell_edge_km,
        })
    }

    /// The configured cell edge length in kilometers.
    pub fn cell_edge_km(&self) -> f64 {
        self.cell_edge_km
    }

    /// Splits `bounds` into a raster of grid cells.
    ///
    /// Cells are emitted column-major-stable: all rows of column 0 south to
    /// north, then column 1, and so on. The order carries no meaning but is
    /// fixed so repeated runs produce identical work lists.
    ///
    /// Degenerate bounds (inverted axes, zero projected extent, or a single
    /// point) yield an empty list, never an error: a grid over zero-area
    /// space is meaningless and downstream code treats "no cells" as "no
    /// work".
    pub fn partition(&self, bounds: &GeodeticRegion) -> Result<Vec<GridCell>, GridError> {
        if bounds.is_degenerate() || bounds.is_empty() {
            warn!(?bounds, "Degenerate bounds; producing no grid cells");
            return Ok(Vec::new());
        }

        let (min_x, min_y) = self.projection.to_planar(bounds.west, bounds.south)?;
        let (max_x, max_y) = self.projection.to_planar(bounds.east, bounds.north)?;
        let cell_m = self.cell_edge_km * 1000.0;

        if max_x <= min_x || max_y <= min_y {
            warn!(?bounds, "Degenerate projected bounds; cannot create grid");
            return Ok(Vec::new());
        }

        let nx = ((max_x - min_x) / cell_m).ceil() as u32;
        let ny = ((max_y - min_y) / cell_m).ceil() as u32;

        let mut cells = Vec::with_capacity((nx * ny) as usize);
        for i in 0..nx {
            for j in 0..ny {
                let cell_min_x = min_x + f64::from(i) * cell_m;
                let cell_max_x = min_x + f64::from(i + 1) * cell_m;
                let cell_min_y = min_y + f64::from(j) * cell_m;
                let cell_max_y = min_y + f64::from(j + 1) * cell_m;

                let (min_lon, min_lat) = self.projection.to_geodetic(cell_min_x, cell_min_y)?;
                let (max_lon, max_lat) = self.projection.to_geodetic(cell_max_x, cell_max_y)?;

                cells.push(GridCell {
                    min_lon,
                    min_lat,
                    max_lon,
                    max_lat,
                    grid_x: i,
                    grid_y: j,
                });
            }
        }

        debug!(
            cells = cells.len(),
            columns = nx,
            rows = ny,
            edge_km = self.cell_edge_km,
            "Created grid cells"
        );
        Ok(cells)
    }
}
