use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::query_builder::QueryBuilder;
use crate::database::{DatabaseError, Row, Table, TableStore};
use crate::filter::Filter;

/// PostgreSQL-backed store. Rows are read with `row_to_json` and written
/// through `json_populate_record`, so the column types live only in the
/// migrations.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    query_logging: bool,
}

impl PgStore {
    pub fn new(pool: PgPool, query_logging: bool) -> Self {
        Self { pool, query_logging }
    }

    fn log(&self, op: &str, table: Table, started: Instant) {
        if self.query_logging {
            tracing::debug!(table = %table, op, elapsed_ms = started.elapsed().as_millis() as u64, "store query");
        }
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>, DatabaseError> {
        let started = Instant::now();
        let rows = QueryBuilder::new(table)?.select_all(&self.pool, &filter).await?;
        self.log("select", table, started);
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, DatabaseError> {
        let started = Instant::now();
        let row = QueryBuilder::new(table)?.insert(&self.pool, &row).await?;
        self.log("insert", table, started);
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, changes: Row) -> Result<Option<Row>, DatabaseError> {
        let started = Instant::now();
        let row = QueryBuilder::new(table)?.update(&self.pool, id, &changes).await?;
        self.log("update", table, started);
        Ok(row)
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, DatabaseError> {
        let started = Instant::now();
        let deleted = QueryBuilder::new(table)?.delete(&self.pool, id).await?;
        self.log("delete", table, started);
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
