use serde_json::Value;
use sqlx::{postgres::PgArguments, types::Json, PgPool, Row as _};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::{Row, Table};
use crate::filter::{Filter, SqlResult};

/// Builds the write statements for one table. Row values travel as a single
/// JSON parameter and are coerced to column types by
/// `json_populate_record`, so no per-type binding is needed.
pub struct QueryBuilder {
    table: Table,
}

impl QueryBuilder {
    pub fn new(table: Table) -> Result<Self, DatabaseError> {
        Filter::validate_table_name(table.name())?;
        Ok(Self { table })
    }

    pub fn select_sql(&self, filter: &Filter) -> Result<SqlResult, DatabaseError> {
        Ok(filter.to_sql(self.table.name())?)
    }

    pub fn insert_sql(&self, row: &Row) -> Result<String, DatabaseError> {
        let table = self.table.name();
        let columns = Self::quoted_columns(row)?;
        if columns.is_empty() {
            return Ok(format!(
                "INSERT INTO \"{table}\" AS r DEFAULT VALUES RETURNING row_to_json(r) AS row"
            ));
        }
        let list = columns.join(", ");
        Ok(format!(
            "INSERT INTO \"{table}\" AS r ({list}) SELECT {list} FROM json_populate_record(NULL::\"{table}\", $1::json) RETURNING row_to_json(r) AS row"
        ))
    }

    /// `$1` is the JSON changes object, `$2` the row id. An empty change set
    /// reads the row back without writing.
    pub fn update_sql(&self, changes: &Row) -> Result<String, DatabaseError> {
        let table = self.table.name();
        if changes.is_empty() {
            return Ok(format!(
                "SELECT row_to_json(r) AS row FROM \"{table}\" r WHERE $1::json IS NOT NULL AND r.\"id\" = $2"
            ));
        }
        let mut assignments: Vec<String> = Self::quoted_columns(changes)?
            .into_iter()
            .map(|col| format!("{col} = (SELECT {col} FROM json_populate_record(NULL::\"{table}\", $1::json))"))
            .collect();
        if self.table.has_updated_at() && !changes.contains_key("updated_at") {
            assignments.push("\"updated_at\" = now()".to_string());
        }
        Ok(format!(
            "UPDATE \"{table}\" AS r SET {} WHERE r.\"id\" = $2 RETURNING row_to_json(r) AS row",
            assignments.join(", ")
        ))
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM \"{}\" WHERE \"id\" = $1", self.table.name())
    }

    pub async fn select_all(&self, pool: &PgPool, filter: &Filter) -> Result<Vec<Row>, DatabaseError> {
        let sql_result = self.select_sql(filter)?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_json(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        rows.iter().map(decode_row).collect()
    }

    pub async fn insert(&self, pool: &PgPool, row: &Row) -> Result<Row, DatabaseError> {
        let sql = self.insert_sql(row)?;
        let value = Value::Object(row.clone());
        let mut q = sqlx::query(&sql);
        if !row.is_empty() {
            q = bind_json(q, &value);
        }
        let pg_row = q
            .fetch_one(pool)
            .await
            .map_err(|e| self.map_write_error(e))?;
        decode_row(&pg_row)
    }

    pub async fn update(&self, pool: &PgPool, id: Uuid, changes: &Row) -> Result<Option<Row>, DatabaseError> {
        let sql = self.update_sql(changes)?;
        let value = Value::Object(changes.clone());
        let pg_row = sqlx::query(&sql)
            .bind(Json(&value))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| self.map_write_error(e))?;
        pg_row.as_ref().map(decode_row).transpose()
    }

    pub async fn delete(&self, pool: &PgPool, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(&self.delete_sql()).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    fn quoted_columns(row: &Row) -> Result<Vec<String>, DatabaseError> {
        row.keys()
            .map(|k| {
                Filter::validate_column(k)?;
                Ok(format!("\"{}\"", k))
            })
            .collect()
    }

    fn map_write_error(&self, err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db) = &err {
            // unique_violation
            if db.code().as_deref() == Some("23505") {
                return DatabaseError::Conflict(format!("duplicate row in {}", self.table));
            }
        }
        DatabaseError::Sqlx(err)
    }
}

fn decode_row(pg_row: &sqlx::postgres::PgRow) -> Result<Row, DatabaseError> {
    let value: Value = pg_row.try_get("row")?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DatabaseError::QueryError(format!("expected row object, got {}", other))),
    }
}

fn bind_json<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    q.bind(Json(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_sql_lists_only_given_columns() {
        let qb = QueryBuilder::new(Table::Skills).unwrap();
        let sql = qb
            .insert_sql(&row(json!({ "name": "Rust", "category": "Languages" })))
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"skills\" AS r (\"category\", \"name\") SELECT \"category\", \"name\" FROM json_populate_record(NULL::\"skills\", $1::json) RETURNING row_to_json(r) AS row"
        );
    }

    #[test]
    fn update_sql_stamps_updated_at() {
        let qb = QueryBuilder::new(Table::Experience).unwrap();
        let sql = qb.update_sql(&row(json!({ "company": "Acme" }))).unwrap();
        assert!(sql.starts_with("UPDATE \"experience\" AS r SET \"company\" = (SELECT \"company\""));
        assert!(sql.contains("\"updated_at\" = now()"));
        assert!(sql.ends_with("WHERE r.\"id\" = $2 RETURNING row_to_json(r) AS row"));
    }

    #[test]
    fn update_sql_for_messages_skips_updated_at() {
        let qb = QueryBuilder::new(Table::ContactMessages).unwrap();
        let sql = qb.update_sql(&row(json!({ "read": true }))).unwrap();
        assert!(!sql.contains("updated_at"));
    }

    #[test]
    fn empty_update_is_a_select() {
        let qb = QueryBuilder::new(Table::Skills).unwrap();
        let sql = qb.update_sql(&Row::new()).unwrap();
        assert!(sql.starts_with("SELECT row_to_json(r)"));
    }

    #[test]
    fn rejects_hostile_column_names() {
        let qb = QueryBuilder::new(Table::Skills).unwrap();
        assert!(qb.insert_sql(&row(json!({ "name\" text); --": 1 }))).is_err());
    }
}
