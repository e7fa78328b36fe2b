use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::types::{FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Equality conditions, ordering and limit for one table read.
///
/// The same filter drives both SQL generation (`to_sql`) and in-process
/// evaluation (`matches` / `sort`), so both store backends agree on results.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i32>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, data: impl Into<Value>) -> Result<Self, FilterError> {
        Self::validate_column(column)?;
        self.conditions.push(FilterWhereInfo { column: column.to_string(), data: data.into() });
        Ok(self)
    }

    pub fn order(mut self, order: impl Into<FilterOrderInfo>) -> Self {
        self.order_data.push(order.into());
        self
    }

    pub fn limit(mut self, limit: i32) -> Result<Self, FilterError> {
        if limit < 0 {
            return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string()));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// `SELECT row_to_json(r)` over the table. Each condition binds a one-key
    /// JSON object which postgres coerces to the column type through
    /// `json_populate_record`, so uuid/date/bool columns compare natively.
    pub fn to_sql(&self, table_name: &str) -> Result<SqlResult, FilterError> {
        Self::validate_table_name(table_name)?;

        let mut params = Vec::with_capacity(self.conditions.len());
        let mut where_parts = Vec::with_capacity(self.conditions.len());
        for (index, condition) in self.conditions.iter().enumerate() {
            where_parts.push(format!(
                "r.\"{col}\" = (SELECT \"{col}\" FROM json_populate_record(NULL::\"{table}\", ${n}::json))",
                col = condition.column,
                table = table_name,
                n = index + 1,
            ));
            let mut param = Map::new();
            param.insert(condition.column.clone(), condition.data.clone());
            params.push(Value::Object(param));
        }

        let query = [
            "SELECT row_to_json(r) AS row".to_string(),
            format!("FROM \"{}\" r", table_name),
            if where_parts.is_empty() { String::new() } else { format!("WHERE {}", where_parts.join(" AND ")) },
            FilterOrder::generate(&self.order_data, "r"),
            self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.conditions
            .iter()
            .all(|c| row.get(&c.column).map(|v| values_equal(v, &c.data)).unwrap_or(c.data.is_null()))
    }

    /// Applies ordering and limit to rows that already passed `matches`.
    pub fn sort(&self, rows: &mut Vec<Map<String, Value>>) {
        if !self.order_data.is_empty() {
            rows.sort_by(|a, b| FilterOrder::compare(&self.order_data, a, b));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit.max(0) as usize);
        }
    }

    pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    pub fn validate_column(name: &str) -> Result<(), FilterError> {
        if !is_identifier(name) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", name)));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        // uuids may arrive in either case
        (Value::String(a), Value::String(b)) => a.eq_ignore_ascii_case(b),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => stored == wanted,
    }
}
