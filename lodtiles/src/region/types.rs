//! Geodetic region type definitions

use serde::{Deserialize, Serialize};

/// Rough meters per degree of latitude, used for heuristic size estimates.
///
/// This is deliberately not a precise geodesic constant. It feeds the
/// geometric-error heuristics, where only the order of magnitude matters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A geographic bounding box in degrees plus a height range in meters.
///
/// Matches the 3D Tiles `boundingVolume.region` layout and serializes as the
/// 6-element array `[west, south, east, north, min_height, max_height]`.
///
/// A region is *degenerate* when any axis is inverted (`west > east`,
/// `south > north`, or `min_height > max_height`). Degenerate regions are
/// excluded from aggregation rather than silently repaired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct GeodeticRegion {
    /// Western bound in degrees
    pub west: f64,
    /// Southern bound in degrees
    pub south: f64,
    /// Eastern bound in degrees
    pub east: f64,
    /// Northern bound in degrees
    pub north: f64,
    /// Minimum height in meters
    pub min_height: f64,
    /// Maximum height in meters
    pub max_height: f64,
}

impl GeodeticRegion {
    /// The empty sentinel region `{0,0,0,0,0,0}`.
    ///
    /// Returned by aggregation when no valid input exists. Callers must
    /// check for it with [`GeodeticRegion::is_empty`] instead of relying on
    /// an error path.
    pub const EMPTY: GeodeticRegion = GeodeticRegion {
        west: 0.0,
        south: 0.0,
        east: 0.0,
        north: 0.0,
        min_height: 0.0,
        max_height: 0.0,
    };

    /// Creates a region from horizontal bounds with a zero height range.
    pub fn flat(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
            min_height: 0.0,
            max_height: 0.0,
        }
    }

    /// Creates a region from all six bounds.
    pub fn new(
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        min_height: f64,
        max_height: f64,
    ) -> Self {
        Self {
            west,
            south,
            east,
            north,
            min_height,
            max_height,
        }
    }

    /// Returns true when any axis is inverted.
    ///
    /// Zero-extent regions (e.g. a single point) are *not* degenerate;
    /// only actual inversions are.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.west > self.east || self.south > self.north || self.min_height > self.max_height
    }

    /// Returns true when this is exactly the empty sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Longitudinal span in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Latitudinal span in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Returns true when `other` lies entirely within this region.
    pub fn contains(&self, other: &GeodeticRegion) -> bool {
        self.west <= other.west
            && self.south <= other.south
            && self.east >= other.east
            && self.north >= other.north
            && self.min_height <= other.min_height
            && self.max_height >= other.max_height
    }
}

impl From<[f64; 6]> for GeodeticRegion {
    fn from(r: [f64; 6]) -> Self {
        Self {
            west: r[0],
            south: r[1],
            east: r[2],
            north: r[3],
            min_height: r[4],
            max_height: r[5],
        }
    }
}

impl From<GeodeticRegion> for [f64; 6] {
    fn from(r: GeodeticRegion) -> Self {
        [
            r.west,
            r.south,
            r.east,
            r.north,
            r.min_height,
            r.max_height,
        ]
    }
}
