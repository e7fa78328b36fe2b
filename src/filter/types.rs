use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Fixed list ordering declared by an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub sort: SortDirection,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Asc }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, sort: SortDirection::Desc }
    }
}

impl From<OrderBy> for FilterOrderInfo {
    fn from(order: OrderBy) -> Self {
        Self { column: order.column.to_string(), sort: order.sort }
    }
}

/// Equality condition on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
