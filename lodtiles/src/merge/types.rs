//! Merge types and errors

use std::path::Path;

use thiserror::Error;

use crate::region::{self, GeodeticRegion};
use crate::tileset::{self, Refine, TilesetError};

/// Default cap on direct children before a node subdivides.
pub const DEFAULT_MAX_CHILDREN_PER_NODE: usize = 8;

/// Default error threshold below which items stop being subdivided.
pub const DEFAULT_MIN_LEAF_ERROR: f64 = 100.0;

/// Default recursion guard. Coincident leaf centers can make quadrant
/// splitting a no-op, so depth must be bounded.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default floor for the root's geometric error in meters.
///
/// Prevents a sparse or tightly clustered dataset from producing a root
/// that refines away the moment the camera sees it.
pub const DEFAULT_ROOT_ERROR_FLOOR: f64 = 200_000.0;

/// Errors that can occur while merging leaf descriptors.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Leaf descriptor failed validation and was rejected
    #[error("Malformed leaf descriptor '{uri}': {reason}")]
    MalformedLeaf { uri: String, reason: String },

    /// Reading a leaf tileset or writing the merged output failed
    #[error(transparent)]
    Tileset(#[from] TilesetError),
}

/// Tuning knobs for hierarchy construction.
///
/// The error heuristics have no physical derivation beyond "coarse enough
/// to always refine from afar"; their shape (monotonic halving with depth,
/// floored root) is fixed but the constants are configuration.
#[derive(Debug, Clone, Copy)]
pub struct MergeConfig {
    /// Maximum direct leaf references per node before subdividing
    pub max_children_per_node: usize,
    /// Nodes whose items all fall below this error are not subdivided
    pub min_leaf_error: f64,
    /// Hard recursion depth guard
    pub max_depth: u32,
    /// Minimum geometric error assigned to the root
    pub root_error_floor: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_children_per_node: DEFAULT_MAX_CHILDREN_PER_NODE,
            min_leaf_error: DEFAULT_MIN_LEAF_ERROR,
            max_depth: DEFAULT_MAX_DEPTH,
            root_error_floor: DEFAULT_ROOT_ERROR_FLOOR,
        }
    }
}

impl MergeConfig {
    /// Set the maximum direct children per node.
    pub fn with_max_children_per_node(mut self, n: usize) -> Self {
        self.max_children_per_node = n;
        self
    }

    /// Set the minimum leaf error threshold.
    pub fn with_min_leaf_error(mut self, error: f64) -> Self {
        self.min_leaf_error = error;
        self
    }

    /// Set the recursion depth guard.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the root error floor.
    pub fn with_root_error_floor(mut self, floor: f64) -> Self {
        self.root_error_floor = floor;
        self
    }
}

/// Reference to one externally materialized leaf tileset.
///
/// Owned by the external tiler; the merger only reads it. The region center
/// is computed once at construction and keys quadrant partitioning, so the
/// merge result does not depend on input order.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDescriptor {
    /// Path to the leaf's own descriptor, relative to the merged output
    pub content_uri: String,
    /// The leaf's bounding region, copied verbatim from its descriptor
    pub region: GeodeticRegion,
    /// The leaf's own error budget
    pub geometric_error: f64,
    /// The leaf's own refine mode, preserved as supplied
    pub refine: Refine,
    center: (f64, f64),
}

impl LeafDescriptor {
    /// Validates and constructs a leaf descriptor.
    ///
    /// # Errors
    ///
    /// Rejects degenerate regions and non-finite or negative geometric
    /// errors so that one bad leaf cannot corrupt the aggregate bounding
    /// volume.
    pub fn new(
        content_uri: impl Into<String>,
        region: GeodeticRegion,
        geometric_error: f64,
        refine: Refine,
    ) -> Result<Self, MergeError> {
        let content_uri = content_uri.into();
        if region.is_degenerate() {
            return Err(MergeError::MalformedLeaf {
                uri: content_uri,
                reason: format!("degenerate region {:?}", region),
            });
        }
        if !geometric_error.is_finite() || geometric_error < 0.0 {
            return Err(MergeError::MalformedLeaf {
                uri: content_uri,
                reason: format!("invalid geometric error {}", geometric_error),
            });
        }
        let center = region::center(&region);
        Ok(Self {
            content_uri,
            region,
            geometric_error,
            refine,
            center,
        })
    }

    /// Loads a leaf descriptor from an externally produced tileset file.
    ///
    /// Region and refine come from the file's root node, the error budget
    /// from its top-level `geometricError`, and the content URI is the
    /// file's path relative to `output_dir`.
    pub fn from_tileset_file(path: &Path, output_dir: &Path) -> Result<Self, MergeError> {
        let doc = tileset::read_tileset(path)?;
        let uri = tileset::relative_content_uri(path, output_dir);
        Self::new(
            uri,
            doc.root.bounding_volume.region,
            doc.geometric_error,
            doc.root.refine,
        )
    }

    /// The precomputed center of the leaf's region, in degrees.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        self.center
    }
}
