//! PostgreSQL-backed POI repository.
//!
//! The `poi` table is created lazily by [`PoiRepository::delete_all`], so a
//! fresh database reports a missing collection on reads until the first load.
//! Each chunk is written with a single `INSERT ... SELECT FROM UNNEST`.

use async_trait::async_trait;
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::{Array, Double, Uuid as SqlUuid, Varchar};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{PoiRepository, PoiRepositoryError};
use crate::domain::{CandidatePoi, Poi};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::PoiRow;
use super::pool::DbPool;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS poi (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(500) NOT NULL,
    latitude DECIMAL(15, 10) NOT NULL,
    longitude DECIMAL(15, 10) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS idx_poi_title ON poi (title)";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS poi";

/// `gen_random_uuid()` lives in pgcrypto before PostgreSQL 13.
const CREATE_EXTENSION_SQL: &str = r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto""#;

const SYNC_SCHEMA_SQL: [&str; 4] = [
    CREATE_EXTENSION_SQL,
    DROP_TABLE_SQL,
    CREATE_TABLE_SQL,
    CREATE_INDEX_SQL,
];

const ENSURE_COLLECTION_SQL: [&str; 3] = [CREATE_EXTENSION_SQL, CREATE_TABLE_SQL, CREATE_INDEX_SQL];

const DELETE_SQL: &str = "DELETE FROM poi";

const INSERT_SQL: &str = r#"
INSERT INTO poi (id, title, latitude, longitude)
SELECT id, title, latitude::DECIMAL(15, 10), longitude::DECIMAL(15, 10)
FROM UNNEST($1, $2, $3, $4) AS chunk(id, title, latitude, longitude)
"#;

const LIST_SQL: &str = r#"
SELECT id, title, latitude::FLOAT8 AS latitude, longitude::FLOAT8 AS longitude, created_at
FROM poi
ORDER BY created_at, title
"#;

const SEARCH_SQL: &str = r#"
SELECT id, title, latitude::FLOAT8 AS latitude, longitude::FLOAT8 AS longitude, created_at
FROM poi
WHERE strpos(title, $1) > 0
ORDER BY created_at, title
"#;

/// Diesel-backed implementation of the POI repository port.
#[derive(Clone)]
pub struct DieselPoiRepository {
    pool: DbPool,
}

impl DieselPoiRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use poi_backend::outbound::persistence::{DbPool, DieselPoiRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/poi")).await?;
    /// let repository = DieselPoiRepository::new(pool);
    /// repository.sync_schema().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Drop and recreate the `poi` table and its index in one transaction,
    /// installing pgcrypto first when it is missing.
    ///
    /// Every stored POI is discarded.
    ///
    /// # Errors
    ///
    /// Returns a connection error when no connection is available and a query
    /// error when any DDL statement fails; the transaction is then rolled back.
    pub async fn sync_schema(&self) -> Result<(), PoiRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, DieselError, _>(|conn| {
            async move {
                for statement in SYNC_SCHEMA_SQL {
                    sql_query(statement).execute(conn).await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, "sync poi schema"))?;
        info!("recreated poi table");
        Ok(())
    }
}

async fn ensure_collection(conn: &mut AsyncPgConnection) -> Result<(), PoiRepositoryError> {
    for statement in ENSURE_COLLECTION_SQL {
        sql_query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|err| map_diesel_error(err, "ensure poi collection"))?;
    }
    Ok(())
}

fn to_count(affected: usize) -> Result<u64, PoiRepositoryError> {
    u64::try_from(affected).map_err(|_| PoiRepositoryError::query("affected row count overflow"))
}

#[async_trait]
impl PoiRepository for DieselPoiRepository {
    async fn delete_all(&self) -> Result<u64, PoiRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        ensure_collection(&mut conn).await?;
        let deleted = sql_query(DELETE_SQL)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete pois"))?;
        to_count(deleted)
    }

    async fn insert_chunk(&self, records: &[CandidatePoi]) -> Result<u64, PoiRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = records.iter().map(|record| *record.id.as_uuid()).collect();
        let titles: Vec<String> = records.iter().map(|record| record.title.clone()).collect();
        let latitudes: Vec<f64> = records.iter().map(|record| record.latitude).collect();
        let longitudes: Vec<f64> = records.iter().map(|record| record.longitude).collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = sql_query(INSERT_SQL)
            .bind::<Array<SqlUuid>, _>(ids)
            .bind::<Array<Varchar>, _>(titles)
            .bind::<Array<Double>, _>(latitudes)
            .bind::<Array<Double>, _>(longitudes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "insert poi chunk"))?;
        debug!(requested = records.len(), inserted, "inserted poi rows");
        to_count(inserted)
    }

    async fn list_all(&self) -> Result<Vec<Poi>, PoiRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PoiRow> = sql_query(LIST_SQL)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list pois"))?;
        Ok(rows.into_iter().map(Poi::from).collect())
    }

    async fn search_by_title(&self, text: &str) -> Result<Vec<Poi>, PoiRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PoiRow> = sql_query(SEARCH_SQL)
            .bind::<Varchar, _>(text)
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "search pois"))?;
        Ok(rows.into_iter().map(Poi::from).collect())
    }

    async fn ping(&self) -> Result<(), PoiRepositoryError> {
        self.pool.ping().await.map_err(map_pool_error)
    }
}
