use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::{DatabaseError, Row, Table, TableStore};
use crate::filter::Filter;

/// In-process store with the same observable behavior as `PgStore`:
/// store-assigned ids and timestamps, partial updates, unique columns.
/// Used for development runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful insert/update/delete calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Fixed-width microsecond timestamps so string order is time order.
    fn now() -> Value {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn check_unique(table: Table, rows: &[Row], candidate: &Row, skip_id: Option<&str>) -> Result<(), DatabaseError> {
        for column in table.unique_columns() {
            let Some(value) = candidate.get(*column).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = rows.iter().any(|row| {
                let same_row = skip_id.is_some() && row.get("id").and_then(Value::as_str) == skip_id;
                !same_row && row.get(*column) == Some(value)
            });
            if clash {
                return Err(DatabaseError::Conflict(format!("duplicate {} in {}", column, table)));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&table)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default();
        filter.sort(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, DatabaseError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();

        row.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        let now = Self::now();
        row.entry("created_at").or_insert_with(|| now.clone());
        if table.has_updated_at() {
            row.entry("updated_at").or_insert(now);
        }
        Self::check_unique(table, rows, &row, None)?;

        rows.push(row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, changes: Row) -> Result<Option<Row>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let id = id.to_string();
        let Some(index) = rows.iter().position(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str())) else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(rows[index].clone()));
        }

        let mut updated = rows[index].clone();
        for (column, value) in changes {
            updated.insert(column, value);
        }
        if table.has_updated_at() {
            updated.insert("updated_at".to_string(), Self::now());
        }
        Self::check_unique(table, rows, &updated, Some(id.as_str()))?;

        rows[index] = updated.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(updated))
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        let id = id.to_string();
        let before = rows.len();
        rows.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
        let deleted = rows.len() != before;
        if deleted {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::OrderBy;
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let inserted = store
            .insert(Table::Skills, row(json!({ "name": "Rust", "category": "Languages", "proficiency_level": 5 })))
            .await
            .unwrap();
        assert!(Uuid::parse_str(inserted["id"].as_str().unwrap()).is_ok());
        assert!(inserted.contains_key("created_at"));
        assert!(inserted.contains_key("updated_at"));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn update_only_touches_given_columns() {
        let store = MemoryStore::new();
        let inserted = store
            .insert(Table::Skills, row(json!({ "name": "Rust", "category": "Languages" })))
            .await
            .unwrap();
        let id = Uuid::parse_str(inserted["id"].as_str().unwrap()).unwrap();

        let updated = store
            .update(Table::Skills, id, row(json!({ "category": "Systems" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["name"], "Rust");
        assert_eq!(updated["category"], "Systems");
        assert_eq!(updated["created_at"], inserted["created_at"]);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.update(Table::Skills, id, row(json!({ "name": "x" }))).await.unwrap().is_none());
        assert!(!store.delete(Table::Skills, id).await.unwrap());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn empty_update_does_not_write() {
        let store = MemoryStore::new();
        let inserted = store
            .insert(Table::ContactMessages, row(json!({ "name": "Ada", "read": true })))
            .await
            .unwrap();
        let id = Uuid::parse_str(inserted["id"].as_str().unwrap()).unwrap();
        let same = store.update(Table::ContactMessages, id, Row::new()).await.unwrap().unwrap();
        assert_eq!(same, inserted);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn enforces_unique_columns() {
        let store = MemoryStore::new();
        store.insert(Table::Users, row(json!({ "email": "a@example.com" }))).await.unwrap();
        let err = store
            .insert(Table::Users, row(json!({ "email": "a@example.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn select_filters_and_orders() {
        let store = MemoryStore::new();
        for (name, category) in [("Rust", "b"), ("React", "a"), ("Go", "b")] {
            store
                .insert(Table::Skills, row(json!({ "name": name, "category": category })))
                .await
                .unwrap();
        }
        let rows = store
            .select(Table::Skills, Filter::new().order(OrderBy::asc("category")))
            .await
            .unwrap();
        assert_eq!(rows[0]["name"], "React");

        let rows = store
            .select(Table::Skills, Filter::new().eq("category", "b").unwrap())
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }
}
