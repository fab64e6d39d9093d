//! 3D Tiles tileset descriptor model
//!
//! Serde model for the `tileset.json` boundary format: an `asset` header, a
//! top-level `geometricError` mirroring the root node's, and a recursive
//! `root` tile tree. Every node carries a region bounding volume, an error
//! budget, and a refine mode, plus either `children` or `content.uri`,
//! never both.
//!
//! Writes are atomic: the document is serialized to a sibling temp file and
//! renamed over the target, so readers never observe a half-written
//! tileset.

mod types;

pub use types::{Asset, BoundingVolume, Refine, Tile, TileContent, Tileset, TilesetError};

use std::fs;
use std::path::Path;

use tracing::{debug, info};

/// Reads and deserializes a tileset descriptor.
pub fn read_tileset(path: &Path) -> Result<Tileset, TilesetError> {
    let data = fs::read_to_string(path).map_err(|e| TilesetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tileset = serde_json::from_str(&data)?;
    Ok(tileset)
}

/// Serializes a tileset descriptor to `path`, atomically.
///
/// The JSON is written to `<path>.tmp` in the same directory and renamed
/// into place. On any failure the previous file at `path` is left intact.
pub fn write_tileset(path: &Path, tileset: &Tileset) -> Result<(), TilesetError> {
    let json = serde_json::to_string_pretty(tileset)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let io_err = |e| TilesetError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    fs::write(&tmp, json).map_err(io_err)?;
    if let Err(e) = fs::rename(&tmp, path) {
        // Leave the previous tileset untouched; just clean up our temp file
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }

    debug!(path = %path.display(), "Wrote tileset");
    Ok(())
}

/// Resolves a leaf tileset path relative to the merged output's directory.
///
/// The resulting URI always uses forward slashes, as required by tileset
/// consumers regardless of platform.
pub fn relative_content_uri(leaf_path: &Path, output_dir: &Path) -> String {
    let relative = leaf_path.strip_prefix(output_dir).unwrap_or(leaf_path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let uri = parts.join("/");
    info!(uri = %uri, "Resolved leaf content URI");
    uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::GeodeticRegion;

    fn sample_tileset() -> Tileset {
        Tileset {
            asset: Asset::current(),
            geometric_error: 500.0,
            root: Tile {
                bounding_volume: BoundingVolume {
                    region: GeodeticRegion::flat(11.0, 49.0, 11.2, 49.2),
                },
                geometric_error: 500.0,
                refine: Refine::Replace,
                children: vec![Tile {
                    bounding_volume: BoundingVolume {
                        region: GeodeticRegion::flat(11.0, 49.0, 11.1, 49.1),
                    },
                    geometric_error: 50.0,
                    refine: Refine::Add,
                    children: Vec::new(),
                    content: Some(TileContent {
                        uri: "cell_0_0/tileset.json".to_string(),
                    }),
                }],
                content: None,
            },
        }
    }

    #[test]
    fn test_refine_serializes_as_uppercase_literals() {
        assert_eq!(serde_json::to_string(&Refine::Add).unwrap(), "\"ADD\"");
        assert_eq!(
            serde_json::to_string(&Refine::Replace).unwrap(),
            "\"REPLACE\""
        );
    }

    #[test]
    fn test_node_with_content_omits_children() {
        let tileset = sample_tileset();
        let json = serde_json::to_value(&tileset).unwrap();

        let leaf = &json["root"]["children"][0];
        assert_eq!(leaf["content"]["uri"], "cell_0_0/tileset.json");
        assert!(
            leaf.get("children").is_none(),
            "Terminal node must not serialize an empty children array"
        );
    }

    #[test]
    fn test_region_serializes_in_wsen_order() {
        let tileset = sample_tileset();
        let json = serde_json::to_value(&tileset).unwrap();

        let region = json["root"]["boundingVolume"]["region"]
            .as_array()
            .unwrap();
        assert_eq!(region.len(), 6);
        assert_eq!(region[0], 11.0);
        assert_eq!(region[3], 49.2);
    }

    #[test]
    fn test_camel_case_field_names() {
        let tileset = sample_tileset();
        let json = serde_json::to_value(&tileset).unwrap();

        assert!(json.get("geometricError").is_some());
        assert!(json["root"].get("boundingVolume").is_some());
        assert_eq!(json["asset"]["version"], "1.1");
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tileset.json");
        let tileset = sample_tileset();

        write_tileset(&path, &tileset).unwrap();
        let back = read_tileset(&path).unwrap();

        assert_eq!(back.geometric_error, tileset.geometric_error);
        assert_eq!(back.root.refine, Refine::Replace);
        assert_eq!(back.root.children.len(), 1);
        assert_eq!(
            back.root.children[0].content.as_ref().unwrap().uri,
            "cell_0_0/tileset.json"
        );
    }

    #[test]
    fn test_write_leaves_no_temp_file_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tileset.json");

        write_tileset(&path, &sample_tileset()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("tileset.json")]);
    }

    #[test]
    fn test_missing_refine_defaults_to_add() {
        // External tilers do not always emit refine on the root
        let json = r#"{
            "asset": {"version": "1.1"},
            "geometricError": 42.0,
            "root": {
                "boundingVolume": {"region": [0.1, 0.8, 0.2, 0.9, 0.0, 30.0]},
                "geometricError": 42.0
            }
        }"#;
        let tileset: Tileset = serde_json::from_str(json).unwrap();
        assert_eq!(tileset.root.refine, Refine::Add);
    }

    #[test]
    fn test_relative_content_uri_uses_forward_slashes() {
        let output_dir = Path::new("/data/tiles");
        let leaf = Path::new("/data/tiles/cell_2_1/tileset.json");
        assert_eq!(
            relative_content_uri(leaf, output_dir),
            "cell_2_1/tileset.json"
        );
    }
}
