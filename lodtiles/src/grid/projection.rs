//! Distance-true regional projection
//!
//! Wraps `proj4rs` with the fixed WGS84 ↔ ETRS89 / UTM zone 32N
//! (EPSG:25832) transform used for partitioning. UTM32N is distance-true to
//! well under a percent across the datasets this pipeline targets, which is
//! all the grid needs: one projected unit is one meter near the data.

use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use super::types::GridError;

/// Geographic source CRS (WGS84 longitude/latitude).
const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Planar target CRS (ETRS89 / UTM zone 32N, EPSG:25832, meters).
const UTM32N: &str = "+proj=utm +zone=32 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// Bidirectional transform between geodetic degrees and planar meters.
pub struct RegionalProjection {
    geodetic: Proj,
    planar: Proj,
}

impl RegionalProjection {
    /// Builds the fixed regional projection pair.
    pub fn new() -> Result<Self, GridError> {
        Ok(Self {
            geodetic: Proj::from_proj_string(WGS84)?,
            planar: Proj::from_proj_string(UTM32N)?,
        })
    }

    /// Projects geodetic degrees to planar meters.
    pub fn to_planar(&self, lon: f64, lat: f64) -> Result<(f64, f64), GridError> {
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.geodetic, &self.planar, &mut point)?;
        Ok((point.0, point.1))
    }

    /// Projects planar meters back to geodetic degrees.
    pub fn to_geodetic(&self, x: f64, y: f64) -> Result<(f64, f64), GridError> {
        let mut point = (x, y, 0.0);
        transform(&self.planar, &self.geodetic, &mut point)?;
        Ok((point.0.to_degrees(), point.1.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian_maps_to_false_easting() {
        let proj = RegionalProjection::new().unwrap();
        // 9°E is the UTM32N central meridian; easting there is 500km
        let (x, _) = proj.to_planar(9.0, 49.0).unwrap();
        assert!(
            (x - 500_000.0).abs() < 1.0,
            "Easting at central meridian should be ~500000, got {}",
            x
        );
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let proj = RegionalProjection::new().unwrap();
        let (x, y) = proj.to_planar(11.1, 49.45).unwrap();
        let (lon, lat) = proj.to_geodetic(x, y).unwrap();

        assert!((lon - 11.1).abs() < 1e-7, "Longitude roundtrip: {}", lon);
        assert!((lat - 49.45).abs() < 1e-7, "Latitude roundtrip: {}", lat);
    }

    #[test]
    fn test_one_unit_is_roughly_one_meter() {
        let proj = RegionalProjection::new().unwrap();
        // 0.1 degree of latitude is ~11.1km on the ground
        let (_, y1) = proj.to_planar(11.0, 49.0).unwrap();
        let (_, y2) = proj.to_planar(11.0, 49.1).unwrap();

        let span = y2 - y1;
        assert!(
            (span - 11_120.0).abs() < 100.0,
            "0.1 deg latitude should project to ~11.1km, got {}",
            span
        );
    }
}
