//! Configuration file handling for ~/.lodtiles/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. Every
//! recognized option maps to one field of a typed settings struct; unknown
//! keys are ignored so newer config files keep working with older builds.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::merge::{
    MergeConfig, DEFAULT_MAX_CHILDREN_PER_NODE, DEFAULT_MAX_DEPTH, DEFAULT_MIN_LEAF_ERROR,
    DEFAULT_ROOT_ERROR_FLOOR,
};

/// Default grid cell edge length in kilometers.
pub const DEFAULT_CELL_EDGE_KM: f64 = 10.0;

/// Default database URL for a local PostGIS instance.
pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/buildings";

/// Default tiler binary, resolved via PATH.
pub const DEFAULT_TILER_BINARY: &str = "pg2b3dm";

/// Default geometry column of dataset tables.
pub const DEFAULT_GEOMETRY_COLUMN: &str = "geom";

/// Default attribute column carried into tile content.
pub const DEFAULT_ATTRIBUTE_COLUMN: &str = "gml_id";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "tiles";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Grid partitioning settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    /// Cell edge length in kilometers
    pub cell_edge_km: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_edge_km: DEFAULT_CELL_EDGE_KM,
        }
    }
}

/// Hierarchy merge settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSettings {
    pub max_children_per_node: usize,
    pub min_leaf_error: f64,
    pub max_depth: u32,
    pub root_error_floor: f64,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            max_children_per_node: DEFAULT_MAX_CHILDREN_PER_NODE,
            min_leaf_error: DEFAULT_MIN_LEAF_ERROR,
            max_depth: DEFAULT_MAX_DEPTH,
            root_error_floor: DEFAULT_ROOT_ERROR_FLOOR,
        }
    }
}

impl MergeSettings {
    /// Converts to the merger's runtime configuration.
    pub fn to_merge_config(&self) -> MergeConfig {
        MergeConfig::default()
            .with_max_children_per_node(self.max_children_per_node)
            .with_min_leaf_error(self.min_leaf_error)
            .with_max_depth(self.max_depth)
            .with_root_error_floor(self.root_error_floor)
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// External tiler settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TilerSettings {
    pub binary: PathBuf,
    pub geometry_column: String,
    pub attribute_column: String,
}

impl Default for TilerSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_TILER_BINARY),
            geometry_column: DEFAULT_GEOMETRY_COLUMN.to_string(),
            attribute_column: DEFAULT_ATTRIBUTE_COLUMN.to_string(),
        }
    }
}

/// Output location settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
        }
    }
}

/// The complete user configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub grid: GridSettings,
    pub merge: MergeSettings,
    pub database: DatabaseSettings,
    pub tiler: TilerSettings,
    pub output: OutputSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.lodtiles/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        Self::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("grid"))
            .set("cell_edge_km", self.grid.cell_edge_km.to_string());
        ini.with_section(Some("merge"))
            .set(
                "max_children_per_node",
                self.merge.max_children_per_node.to_string(),
            )
            .set("min_leaf_error", self.merge.min_leaf_error.to_string())
            .set("max_depth", self.merge.max_depth.to_string())
            .set("root_error_floor", self.merge.root_error_floor.to_string());
        ini.with_section(Some("database"))
            .set("url", &self.database.url);
        ini.with_section(Some("tiler"))
            .set("binary", self.tiler.binary.display().to_string())
            .set("geometry_column", &self.tiler.geometry_column)
            .set("attribute_column", &self.tiler.attribute_column);
        ini.with_section(Some("output"))
            .set("directory", self.output.directory.display().to_string());

        ini.write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    fn parse_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("grid")) {
            if let Some(value) = section.get("cell_edge_km") {
                config.grid.cell_edge_km = parse_value("grid", "cell_edge_km", value)?;
            }
        }

        if let Some(section) = ini.section(Some("merge")) {
            if let Some(value) = section.get("max_children_per_node") {
                config.merge.max_children_per_node =
                    parse_value("merge", "max_children_per_node", value)?;
            }
            if let Some(value) = section.get("min_leaf_error") {
                config.merge.min_leaf_error = parse_value("merge", "min_leaf_error", value)?;
            }
            if let Some(value) = section.get("max_depth") {
                config.merge.max_depth = parse_value("merge", "max_depth", value)?;
            }
            if let Some(value) = section.get("root_error_floor") {
                config.merge.root_error_floor = parse_value("merge", "root_error_floor", value)?;
            }
        }

        if let Some(section) = ini.section(Some("database")) {
            if let Some(value) = section.get("url") {
                config.database.url = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("tiler")) {
            if let Some(value) = section.get("binary") {
                config.tiler.binary = PathBuf::from(value);
            }
            if let Some(value) = section.get("geometry_column") {
                config.tiler.geometry_column = value.to_string();
            }
            if let Some(value) = section.get("attribute_column") {
                config.tiler.attribute_column = value.to_string();
            }
        }

        if let Some(section) = ini.section(Some("output")) {
            if let Some(value) = section.get("directory") {
                config.output.directory = PathBuf::from(value);
            }
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigFileError> {
    value.parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Get the path to the config directory (~/.lodtiles).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lodtiles")
}

/// Get the path to the config file (~/.lodtiles/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();

        assert_eq!(config.grid.cell_edge_km, DEFAULT_CELL_EDGE_KM);
        assert_eq!(config.merge.max_children_per_node, 8);
        assert_eq!(config.merge.max_depth, 10);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.tiler.binary, PathBuf::from("pg2b3dm"));
        assert_eq!(config.output.directory, PathBuf::from("tiles"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.grid.cell_edge_km = 25.0;
        config.merge.max_children_per_node = 16;
        config.merge.root_error_floor = 50_000.0;
        config.database.url = "postgres://tiler:pw@db:5433/lod2".to_string();
        config.output.directory = PathBuf::from("/srv/tiles");

        config.save_to(&config_path).unwrap();
        let reloaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[grid]\ncell_edge_km = 5\n").unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config.grid.cell_edge_km, 5.0);
        assert_eq!(config.merge, MergeSettings::default());
        assert_eq!(config.database, DatabaseSettings::default());
    }

    #[test]
    fn test_invalid_numeric_value_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[merge]\nmax_depth = very deep\n").unwrap();

        let result = ConfigFile::load_from(&config_path);
        assert!(matches!(
            result,
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_merge_settings_convert_to_merge_config() {
        let settings = MergeSettings {
            max_children_per_node: 4,
            min_leaf_error: 10.0,
            max_depth: 6,
            root_error_floor: 1000.0,
        };
        let config = settings.to_merge_config();

        assert_eq!(config.max_children_per_node, 4);
        assert_eq!(config.min_leaf_error, 10.0);
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.root_error_floor, 1000.0);
    }
}
