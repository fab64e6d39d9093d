//! Hierarchy merging
//!
//! Assembles independently produced leaf tilesets into one quadtree-shaped
//! tileset a streaming client can traverse top-down. Internal nodes
//! subdivide space quadrant-wise on leaf centers and use `REPLACE`
//! refinement (their children jointly cover the parent exactly); nodes that
//! stop subdividing reference their leaves directly with `ADD`, each leaf
//! keeping its own region, error, and refine mode verbatim.
//!
//! The merger is stateless and deterministic: every call rebuilds the full
//! tree from the accumulated leaf set and atomically overwrites the output
//! file. Progressive re-merges may legitimately restructure earlier levels
//! as the population grows.

mod types;

pub use types::{
    LeafDescriptor, MergeConfig, MergeError, DEFAULT_MAX_CHILDREN_PER_NODE, DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_LEAF_ERROR, DEFAULT_ROOT_ERROR_FLOOR,
};

use std::path::Path;

use tracing::{debug, info};

use crate::region::{self, GeodeticRegion};
use crate::tileset::{self, Asset, BoundingVolume, Refine, Tile, TileContent, Tileset};

/// Builds and serializes merged tileset hierarchies.
pub struct HierarchyMerger {
    config: MergeConfig,
}

impl HierarchyMerger {
    /// Creates a merger with the given configuration.
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merges `leaves` into a single hierarchy and writes it to `output_path`.
    ///
    /// An empty leaf set still produces a structurally valid, loadable
    /// tileset (sentinel region, zero error, no children). The write is
    /// atomic; on failure any previously written tileset stays intact.
    pub fn merge(&self, output_path: &Path, leaves: &[LeafDescriptor]) -> Result<Tileset, MergeError> {
        info!(
            leaves = leaves.len(),
            output = %output_path.display(),
            "Merging leaf tilesets"
        );

        let merged = if leaves.is_empty() {
            Self::empty_tileset()
        } else {
            // Key the build on sorted URIs so the result is bit-for-bit
            // identical for any input order.
            let mut items: Vec<&LeafDescriptor> = leaves.iter().collect();
            items.sort_by(|a, b| a.content_uri.cmp(&b.content_uri));

            let regions: Vec<GeodeticRegion> = items.iter().map(|l| l.region).collect();
            let root_region = region::union(&regions);

            let max_leaf_error = items
                .iter()
                .map(|l| l.geometric_error)
                .fold(0.0_f64, f64::max);
            let span_heuristic = region::diagonal_span_meters(&root_region) * 0.5;
            let root_error = span_heuristic
                .max(4.0 * max_leaf_error)
                .max(self.config.root_error_floor);

            let root = self.build_node(&items, root_region, root_error, 0);
            Tileset {
                asset: Asset::current(),
                geometric_error: root_error,
                root,
            }
        };

        tileset::write_tileset(output_path, &merged)?;
        Ok(merged)
    }

    /// The minimal valid hierarchy for an empty leaf set.
    fn empty_tileset() -> Tileset {
        Tileset {
            asset: Asset::current(),
            geometric_error: 0.0,
            root: Tile {
                bounding_volume: BoundingVolume {
                    region: GeodeticRegion::EMPTY,
                },
                geometric_error: 0.0,
                refine: Refine::Add,
                children: Vec::new(),
                content: None,
            },
        }
    }

    /// Recursively builds one node over `items`.
    ///
    /// Returns a freshly constructed subtree; nothing is mutated in place,
    /// which keeps partial failures and re-merges easy to reason about.
    fn build_node(
        &self,
        items: &[&LeafDescriptor],
        region: GeodeticRegion,
        error: f64,
        depth: u32,
    ) -> Tile {
        let is_leaf = items.len() <= self.config.max_children_per_node
            || items
                .iter()
                .all(|l| l.geometric_error < self.config.min_leaf_error)
            || depth > self.config.max_depth;

        if is_leaf {
            if depth > self.config.max_depth {
                debug!(
                    depth,
                    items = items.len(),
                    "Depth guard reached; emitting wide leaf node"
                );
            }
            let children = items
                .iter()
                .map(|leaf| Tile {
                    bounding_volume: BoundingVolume {
                        region: leaf.region,
                    },
                    geometric_error: leaf.geometric_error,
                    refine: leaf.refine,
                    children: Vec::new(),
                    content: Some(TileContent {
                        uri: leaf.content_uri.clone(),
                    }),
                })
                .collect();
            return Tile {
                bounding_volume: BoundingVolume { region },
                geometric_error: error,
                refine: Refine::Add,
                children,
                content: None,
            };
        }

        let (center_lon, center_lat) = region::center(&region);

        // Ties go north and east so the partition is total and deterministic.
        let mut quadrants: [Vec<&LeafDescriptor>; 4] = [vec![], vec![], vec![], vec![]];
        for leaf in items {
            let (lon, lat) = leaf.center();
            let east = lon >= center_lon;
            let north = lat >= center_lat;
            let index = match (east, north) {
                (false, false) => 0, // south-west
                (true, false) => 1,  // south-east
                (false, true) => 2,  // north-west
                (true, true) => 3,   // north-east
            };
            quadrants[index].push(leaf);
        }

        let children = quadrants
            .iter()
            .filter(|quad| !quad.is_empty())
            .map(|quad| {
                // Tight union of the quadrant's own items, not a geometric
                // quarter of the parent: keeps deeper error budgets honest.
                let regions: Vec<GeodeticRegion> = quad.iter().map(|l| l.region).collect();
                let quad_region = region::union(&regions);
                // Halve the budget per level, but never below the quadrant's
                // own leaf errors: a node forced flat by the depth guard must
                // still sit above the verbatim errors of its references.
                let quad_max = quad.iter().map(|l| l.geometric_error).fold(0.0_f64, f64::max);
                let child_error = (error / 2.0).max(quad_max);
                self.build_node(quad, quad_region, child_error, depth + 1)
            })
            .collect();

        Tile {
            bounding_volume: BoundingVolume { region },
            geometric_error: error,
            refine: Refine::Replace,
            children,
            content: None,
        }
    }
}

impl Default for HierarchyMerger {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}
