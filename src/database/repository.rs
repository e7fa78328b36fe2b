use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::crud::Record;
use crate::database::manager::DatabaseError;
use crate::database::{Row, TableStore};
use crate::filter::{Filter, OrderBy};

/// Typed access to one table through the configured store.
pub struct Repository<T> {
    store: Arc<dyn TableStore>,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), _phantom: PhantomData }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store, _phantom: PhantomData }
    }

    /// Every row in the record's fixed order.
    pub async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        self.select_any(Self::ordered()).await
    }

    pub async fn select_any(&self, filter: Filter) -> Result<Vec<T>, DatabaseError> {
        let rows = self.store.select(T::TABLE, filter).await?;
        rows.into_iter().map(decode).collect()
    }

    pub async fn select_one(&self, filter: Filter) -> Result<Option<T>, DatabaseError> {
        let rows = self.store.select(T::TABLE, filter.limit(1)?).await?;
        rows.into_iter().next().map(decode).transpose()
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.select_one(Filter::new().eq("id", id.to_string())?).await
    }

    pub async fn find_by(&self, column: &str, value: impl Into<Value>) -> Result<Option<T>, DatabaseError> {
        self.select_one(Filter::new().eq(column, value)?).await
    }

    /// Like `find`, but a missing row is `NotFound`.
    pub async fn select_404(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.find(id).await?.ok_or_else(|| not_found::<T>(id))
    }

    pub async fn count_where(&self, column: &str, value: impl Into<Value>) -> Result<usize, DatabaseError> {
        let rows = self.store.select(T::TABLE, Filter::new().eq(column, value)?).await?;
        Ok(rows.len())
    }

    pub async fn create(&self, row: Row) -> Result<T, DatabaseError> {
        decode(self.store.insert(T::TABLE, row).await?)
    }

    pub async fn update(&self, id: Uuid, changes: Row) -> Result<T, DatabaseError> {
        match self.store.update(T::TABLE, id, changes).await? {
            Some(row) => decode(row),
            None => Err(not_found::<T>(id)),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        if self.store.delete(T::TABLE, id).await? {
            Ok(())
        } else {
            Err(not_found::<T>(id))
        }
    }

    fn ordered() -> Filter {
        let filter = Filter::new().order(T::ORDER);
        if T::ORDER.column == "created_at" {
            filter
        } else {
            filter.order(OrderBy::asc("created_at"))
        }
    }
}

fn decode<T: Record>(row: Row) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn not_found<T: Record>(id: Uuid) -> DatabaseError {
    DatabaseError::NotFound(format!("{} record {} not found", T::TABLE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ContactForm, ContactMessage, Skill, SkillDraft};
    use crate::database::MemoryStore;
    use crate::crud::Form;

    fn skills() -> Repository<Skill> {
        Repository::new(Arc::new(MemoryStore::new()))
    }

    fn draft(name: &str, category: &str) -> Row {
        SkillDraft { name: name.into(), category: category.into(), proficiency_level: 4 }.into_row()
    }

    #[tokio::test]
    async fn create_then_list_includes_record() {
        let repo = skills();
        let created = repo.create(draft("Rust", "Languages")).await.unwrap();
        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn list_uses_record_order() {
        let repo = skills();
        repo.create(draft("Postgres", "Databases")).await.unwrap();
        repo.create(draft("Axum", "Backend")).await.unwrap();
        repo.create(draft("Redis", "Databases")).await.unwrap();
        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Axum", "Postgres", "Redis"]);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let repo = skills();
        let id = Uuid::new_v4();
        assert!(repo.find(id).await.unwrap().is_none());
        assert!(matches!(repo.select_404(id).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(repo.update(id, draft("x", "y")).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(repo.delete(id).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn messages_list_newest_first_and_count_unread() {
        let store: Arc<dyn TableStore> = Arc::new(MemoryStore::new());
        let repo = Repository::<ContactMessage>::new(store);
        for name in ["first", "second"] {
            let form = ContactForm {
                name: name.into(),
                email: "x@example.com".into(),
                subject: None,
                message: "hi".into(),
            };
            repo.create(form.into_row()).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["second", "first"]);
        assert_eq!(repo.count_where("read", false).await.unwrap(), 2);
    }
}
