//! PostGIS-backed dataset store

use sqlx::postgres::PgPool;
use tracing::{debug, info, warn};

use super::{validate_identifier, DatasetStore, StoreError};
use crate::grid::GridCell;
use crate::region::GeodeticRegion;

/// Dataset store over a PostGIS database.
///
/// The dataset name is the main table name in the `public` schema; staged
/// cell tables are named `<dataset>_cell_<x>_<y>` and carry a GiST index so
/// the external tiler's spatial queries stay fast.
pub struct PostgisStore {
    pool: PgPool,
}

impl PostgisStore {
    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    /// Wraps an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        validate_identifier(table)?;
        let sql = format!(r#"DROP TABLE IF EXISTS public."{}""#, table);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

impl DatasetStore for PostgisStore {
    async fn dataset_bounds(&self, dataset: &str) -> Result<Option<GeodeticRegion>, StoreError> {
        validate_identifier(dataset)?;
        let sql = format!(
            r#"SELECT MIN(ST_XMin(geom)), MIN(ST_YMin(geom)),
                      MAX(ST_XMax(geom)), MAX(ST_YMax(geom))
               FROM public."{}"
               WHERE geom IS NOT NULL AND NOT ST_IsEmpty(geom)"#,
            dataset
        );

        let row: (Option<f64>, Option<f64>, Option<f64>, Option<f64>) =
            sqlx::query_as(&sql).fetch_one(&self.pool).await?;

        match row {
            (Some(west), Some(south), Some(east), Some(north)) => {
                let bounds = GeodeticRegion::flat(west, south, east, north);
                info!(dataset, ?bounds, "Computed dataset bounds");
                Ok(Some(bounds))
            }
            _ => {
                warn!(dataset, "No valid geometries; cannot compute bounds");
                Ok(None)
            }
        }
    }

    async fn stage_cell(
        &self,
        dataset: &str,
        cell: &GridCell,
    ) -> Result<Option<String>, StoreError> {
        validate_identifier(dataset)?;
        let table = format!("{}_{}", dataset, cell.id());
        validate_identifier(&table)?;

        // Start from a clean slate; a previous aborted run may have left
        // the working table behind.
        self.drop_table(&table).await?;

        let create_sql = format!(
            r#"CREATE TABLE public."{table}" AS
               SELECT * FROM public."{dataset}"
               WHERE ST_Intersects(geom, ST_MakeEnvelope($1, $2, $3, $4, 4326))"#,
        );
        sqlx::query(&create_sql)
            .bind(cell.min_lon)
            .bind(cell.min_lat)
            .bind(cell.max_lon)
            .bind(cell.max_lat)
            .execute(&self.pool)
            .await?;

        let count_sql = format!(r#"SELECT COUNT(*) FROM public."{}""#, table);
        let (count,): (i64,) = sqlx::query_as(&count_sql).fetch_one(&self.pool).await?;

        if count == 0 {
            debug!(table, "Cell has no intersecting rows; dropping");
            self.drop_table(&table).await?;
            return Ok(None);
        }

        let index_sql = format!(
            r#"CREATE INDEX "idx_{table}_geom" ON public."{table}" USING GIST(geom)"#,
        );
        sqlx::query(&index_sql).execute(&self.pool).await?;

        info!(table, rows = count, "Staged grid cell");
        Ok(Some(table))
    }

    async fn drop_cell(&self, table: &str) -> Result<(), StoreError> {
        self.drop_table(table).await
    }
}
