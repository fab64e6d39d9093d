//! Geodetic bounding-region algebra
//!
//! Provides the aggregation and measurement primitives shared by the grid
//! partitioner and the hierarchy merger: component-wise union of regions,
//! planar centers, and the heuristic diagonal span used for geometric-error
//! budgets.

mod types;

pub use types::{GeodeticRegion, METERS_PER_DEGREE};

/// Computes the component-wise union of a set of regions.
///
/// Degenerate inputs (inverted on any axis) are skipped rather than folded
/// in, so one malformed region cannot balloon the aggregate. When no valid
/// region remains the empty sentinel is returned; this function never fails.
///
/// # Arguments
///
/// * `regions` - Regions to aggregate, in any order
///
/// # Returns
///
/// The smallest region containing every valid input, or
/// [`GeodeticRegion::EMPTY`] when there is none.
pub fn union(regions: &[GeodeticRegion]) -> GeodeticRegion {
    let mut result: Option<GeodeticRegion> = None;

    for region in regions.iter().filter(|r| !r.is_degenerate()) {
        result = Some(match result {
            None => *region,
            Some(acc) => GeodeticRegion {
                west: acc.west.min(region.west),
                south: acc.south.min(region.south),
                east: acc.east.max(region.east),
                north: acc.north.max(region.north),
                min_height: acc.min_height.min(region.min_height),
                max_height: acc.max_height.max(region.max_height),
            },
        });
    }

    result.unwrap_or(GeodeticRegion::EMPTY)
}

/// Returns the planar center of a region as `(lon, lat)` in degrees.
///
/// This is the arithmetic midpoint of the horizontal bounds, not a geodesic
/// midpoint. At grid-cell scale the difference is negligible, and the
/// quadrant partitioning in the merger depends on this exact definition.
#[inline]
pub fn center(region: &GeodeticRegion) -> (f64, f64) {
    (
        (region.west + region.east) / 2.0,
        (region.south + region.north) / 2.0,
    )
}

/// Approximates the physical extent of a region in meters.
///
/// Uses `max(lon_span, lat_span) * 111000`, which overestimates east-west
/// distances away from the equator. The value only seeds geometric-error
/// heuristics and must not be used for real measurement.
#[inline]
pub fn diagonal_span_meters(region: &GeodeticRegion) -> f64 {
    region.lon_span().max(region.lat_span()) * METERS_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_two_disjoint_regions() {
        let a = GeodeticRegion::flat(11.0, 49.0, 11.1, 49.1);
        let b = GeodeticRegion::flat(11.2, 49.2, 11.3, 49.3);

        let result = union(&[a, b]);

        assert_eq!(result.west, 11.0);
        assert_eq!(result.south, 49.0);
        assert_eq!(result.east, 11.3);
        assert_eq!(result.north, 49.3);
    }

    #[test]
    fn test_union_aggregates_heights_independently() {
        let a = GeodeticRegion::new(11.0, 49.0, 11.1, 49.1, 100.0, 200.0);
        let b = GeodeticRegion::new(11.0, 49.0, 11.1, 49.1, -50.0, 150.0);

        let result = union(&[a, b]);

        assert_eq!(result.min_height, -50.0);
        assert_eq!(result.max_height, 200.0);
    }

    #[test]
    fn test_union_of_empty_slice_is_sentinel() {
        let result = union(&[]);
        assert!(result.is_empty(), "No inputs should yield the sentinel");
    }

    #[test]
    fn test_union_skips_degenerate_regions() {
        let valid = GeodeticRegion::flat(11.0, 49.0, 11.1, 49.1);
        // West > east: inverted, must not widen the aggregate
        let inverted = GeodeticRegion::flat(30.0, 10.0, -30.0, 20.0);

        let result = union(&[inverted, valid, inverted]);

        assert_eq!(result, valid, "Degenerate regions must be skipped");
    }

    #[test]
    fn test_union_of_only_degenerate_regions_is_sentinel() {
        let inverted = GeodeticRegion::flat(30.0, 10.0, -30.0, 20.0);
        let result = union(&[inverted]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_point_region_is_not_degenerate() {
        let point = GeodeticRegion::flat(11.0, 49.0, 11.0, 49.0);
        assert!(!point.is_degenerate());

        let result = union(&[point]);
        assert_eq!(result, point);
    }

    #[test]
    fn test_center_is_arithmetic_midpoint() {
        let region = GeodeticRegion::flat(10.0, 48.0, 12.0, 50.0);
        let (lon, lat) = center(&region);
        assert_eq!(lon, 11.0);
        assert_eq!(lat, 49.0);
    }

    #[test]
    fn test_diagonal_span_uses_larger_axis() {
        // 0.2 degrees of longitude, 0.4 degrees of latitude
        let region = GeodeticRegion::flat(11.0, 49.0, 11.2, 49.4);
        let span = diagonal_span_meters(&region);
        assert!((span - 0.4 * METERS_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn test_contains_self() {
        let region = GeodeticRegion::flat(11.0, 49.0, 11.2, 49.2);
        assert!(region.contains(&region));
    }

    #[test]
    fn test_contains_rejects_overhang() {
        let outer = GeodeticRegion::flat(11.0, 49.0, 11.2, 49.2);
        let overhang = GeodeticRegion::flat(11.1, 49.1, 11.3, 49.15);
        assert!(!outer.contains(&overhang));
    }

    #[test]
    fn test_region_serializes_as_six_element_array() {
        let region = GeodeticRegion::new(11.0, 49.0, 11.2, 49.2, 0.0, 120.0);
        let json = serde_json::to_string(&region).unwrap();
        assert_eq!(json, "[11.0,49.0,11.2,49.2,0.0,120.0]");

        let back: GeodeticRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, region);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_region() -> impl Strategy<Value = GeodeticRegion> {
            (
                -180.0..179.0f64,
                -90.0..89.0f64,
                0.0..1.0f64,
                0.0..1.0f64,
                -100.0..100.0f64,
                0.0..500.0f64,
            )
                .prop_map(|(west, south, lon_ext, lat_ext, min_h, h_ext)| {
                    GeodeticRegion::new(
                        west,
                        south,
                        west + lon_ext,
                        south + lat_ext,
                        min_h,
                        min_h + h_ext,
                    )
                })
        }

        proptest! {
            #[test]
            fn test_union_contains_all_inputs(regions in prop::collection::vec(arb_region(), 1..20)) {
                let result = union(&regions);
                for region in &regions {
                    prop_assert!(
                        result.contains(region),
                        "Union {:?} does not contain input {:?}",
                        result, region
                    );
                }
            }

            #[test]
            fn test_union_is_order_independent(mut regions in prop::collection::vec(arb_region(), 1..20)) {
                let forward = union(&regions);
                regions.reverse();
                let backward = union(&regions);
                prop_assert_eq!(forward, backward);
            }

            #[test]
            fn test_union_is_never_degenerate(regions in prop::collection::vec(arb_region(), 0..20)) {
                let result = union(&regions);
                prop_assert!(!result.is_degenerate());
            }

            #[test]
            fn test_center_lies_inside_region(region in arb_region()) {
                let (lon, lat) = center(&region);
                prop_assert!(lon >= region.west && lon <= region.east);
                prop_assert!(lat >= region.south && lat <= region.north);
            }

            #[test]
            fn test_diagonal_span_is_non_negative(region in arb_region()) {
                prop_assert!(diagonal_span_meters(&region) >= 0.0);
            }
        }
    }
}
