pub mod manager;
pub mod memory;
pub mod models;
pub mod pg_store;
pub mod query_builder;
pub mod repository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::filter::Filter;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use repository::Repository;

/// One table row as a JSON object, keyed by column name.
pub type Row = Map<String, Value>;

/// Tables owned by this service. Names are fixed, so they are safe to
/// interpolate into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Users,
    Profiles,
    Experience,
    Education,
    Skills,
    ContactMessages,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Users,
        Table::Profiles,
        Table::Experience,
        Table::Education,
        Table::Skills,
        Table::ContactMessages,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Profiles => "profiles",
            Table::Experience => "experience",
            Table::Education => "education",
            Table::Skills => "skills",
            Table::ContactMessages => "contact_messages",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether updates stamp `updated_at`.
    pub const fn has_updated_at(&self) -> bool {
        !matches!(self, Table::ContactMessages)
    }

    /// Columns carrying a unique constraint.
    pub const fn unique_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Users => &["email"],
            Table::Profiles => &["user_id"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-level access to the backing store. Every method is exactly one round
/// trip; callers never retry.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn select(&self, table: Table, filter: Filter) -> Result<Vec<Row>, DatabaseError>;

    /// Inserts a row; the store assigns `id` and timestamps.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, DatabaseError>;

    /// Applies `changes` to the row with `id`; columns not present are left
    /// untouched. `None` when no such row exists.
    async fn update(&self, table: Table, id: Uuid, changes: Row) -> Result<Option<Row>, DatabaseError>;

    /// `false` when no such row exists.
    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_round_trip() {
        for table in Table::ALL {
            assert_eq!(Table::from_name(table.name()), Some(table));
        }
        assert_eq!(Table::from_name("orders"), None);
    }

    #[test]
    fn messages_have_no_updated_at() {
        assert!(!Table::ContactMessages.has_updated_at());
        assert!(Table::Experience.has_updated_at());
    }
}
