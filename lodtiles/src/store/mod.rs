//! Spatial datastore abstraction
//!
//! The pipeline never touches geometry itself; it asks a [`DatasetStore`]
//! for the dataset's overall bounds and for per-cell working tables holding
//! exactly the rows that intersect one grid cell's envelope. The concrete
//! backend is PostGIS ([`PostgisStore`]); tests swap in an in-memory fake.

mod postgis;

pub use postgis::PostgisStore;

use std::future::Future;

use thiserror::Error;

use crate::grid::GridCell;
use crate::region::GeodeticRegion;

/// Errors that can occur talking to the datastore.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Dataset or table name is not a safe SQL identifier
    #[error("Invalid identifier '{0}': only [a-zA-Z0-9_] starting with a letter or underscore")]
    InvalidIdentifier(String),
}

/// Access to the geometry store backing one or more datasets.
///
/// A dataset name doubles as the main table name. Implementations must
/// treat staged cell tables as disposable: the pipeline drops them after
/// tiling.
pub trait DatasetStore: Send + Sync {
    /// Returns the union bounds of all valid, non-empty geometries in the
    /// dataset, or `None` when the dataset holds no usable rows.
    fn dataset_bounds(
        &self,
        dataset: &str,
    ) -> impl Future<Output = Result<Option<GeodeticRegion>, StoreError>> + Send;

    /// Isolates the rows intersecting `cell`'s geodetic envelope into a
    /// working table.
    ///
    /// Returns the working table's name, or `None` when no row intersects
    /// the cell (in which case nothing is left behind).
    fn stage_cell(
        &self,
        dataset: &str,
        cell: &GridCell,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Drops a working table created by [`DatasetStore::stage_cell`].
    fn drop_cell(&self, table: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Validates a dataset/table identifier before it is spliced into SQL.
///
/// Table names cannot be bound as query parameters, so anything interpolated
/// must be checked here first.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_identifiers() {
        assert!(validate_identifier("bayern").is_ok());
        assert!(validate_identifier("buildings_lod2").is_ok());
        assert!(validate_identifier("_tmp").is_ok());
        assert!(validate_identifier("bayern_cell_3_7").is_ok());
    }

    #[test]
    fn test_rejects_empty_identifier() {
        assert!(matches!(
            validate_identifier(""),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_rejects_leading_digit() {
        assert!(validate_identifier("3buildings").is_err());
    }

    #[test]
    fn test_rejects_injection_attempts() {
        assert!(validate_identifier("x\"; DROP TABLE users; --").is_err());
        assert!(validate_identifier("a b").is_err());
        assert!(validate_identifier("a-b").is_err());
    }
}
