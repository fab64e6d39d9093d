//! Tileset descriptor types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::region::GeodeticRegion;

/// Tileset format version emitted by this crate.
pub const TILESET_VERSION: &str = "1.1";

/// Errors that can occur reading or writing tileset descriptors.
#[derive(Debug, Error)]
pub enum TilesetError {
    /// Filesystem error on the descriptor file
    #[error("Tileset I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor is not valid JSON or violates the schema
    #[error("Malformed tileset descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The `asset` header of a tileset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Tileset format version, e.g. "1.1"
    pub version: String,
}

impl Asset {
    /// Asset header for tilesets produced by this crate.
    pub fn current() -> Self {
        Self {
            version: TILESET_VERSION.to_string(),
        }
    }
}

/// Refinement mode of a tile node.
///
/// `Add` renders a node's own content together with its children's;
/// `Replace` means children fully supersede the parent. Internal nodes of a
/// non-overlapping spatial subdivision must use `Replace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Refine {
    #[default]
    Add,
    Replace,
}

/// A region bounding volume.
///
/// Other 3D Tiles volume kinds (box, sphere) are out of scope; the whole
/// pipeline speaks regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    pub region: GeodeticRegion,
}

/// Reference to externally produced tile content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileContent {
    /// Path to the content's own descriptor, relative to this tileset
    pub uri: String,
}

/// One node of the tileset tree.
///
/// Terminal nodes carry `content` and no `children`; internal nodes the
/// reverse. Construction sites keep that invariant; the serializer simply
/// omits whichever side is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub bounding_volume: BoundingVolume,

    pub geometric_error: f64,

    #[serde(default)]
    pub refine: Refine,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Tile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TileContent>,
}

impl Tile {
    /// Counts the content-bearing (terminal) nodes in this subtree.
    pub fn leaf_count(&self) -> usize {
        if self.content.is_some() {
            1
        } else {
            self.children.iter().map(Tile::leaf_count).sum()
        }
    }
}

/// A complete tileset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tileset {
    pub asset: Asset,

    /// Mirrors the root node's geometric error
    pub geometric_error: f64,

    pub root: Tile,
}
