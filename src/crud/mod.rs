//! Generic record CRUD shared by the admin handlers and the client screens.
//!
//! Each admin table is described once by an [`Entity`]: its table, list
//! ordering, route segment and the two forms (full `Draft` for create,
//! partial `Patch` for update). Handlers, repository and client screens are
//! all generic over it.

pub mod validate;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::{Row, Table};
use crate::filter::OrderBy;

pub use validate::FieldErrors;

/// A typed view of one table row.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;
    /// List ordering; ties fall back to `created_at`.
    const ORDER: OrderBy;

    fn id(&self) -> Uuid;
}

/// Validated input that becomes the column set of one write.
pub trait Form: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn validate(&self) -> Result<(), FieldErrors>;

    /// Serialized fields as a row. Implementors apply cross-field rules
    /// (e.g. `is_current` clearing `end_date`) here.
    fn into_row(self) -> Row {
        to_row(&self)
    }
}

/// Serializes a struct into a row; anything but an object yields an empty row.
pub fn to_row<T: Serialize>(value: &T) -> Row {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Row::new(),
    }
}

/// An admin-editable table.
pub trait Entity: Record {
    /// Human name used in notices ("Experience created").
    const LABEL: &'static str;
    /// Route segment under `/admin`.
    const PATH: &'static str;

    type Draft: Form;
    type Patch: Form;
}

/// True when `changes` gives a non-null `end_date` without saying whether
/// the row is current, so the stored row decides.
pub fn sets_end_date_only(changes: &Row) -> bool {
    matches!(changes.get("end_date"), Some(v) if !v.is_null()) && !changes.contains_key("is_current")
}

/// A row stored as current cannot take an end date unless the same patch
/// also sets `is_current: false`.
pub fn check_patch(stored: &Row, changes: &Row) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if sets_end_date_only(changes) && stored.get("is_current") == Some(&Value::Bool(true)) {
        errors.add("end_date", "Set is_current to false before adding an end date");
    }
    errors.into_result()
}

/// Column set for a create: the draft's fields plus the owning user.
pub fn draft_row<E: Entity>(draft: E::Draft, owner: Uuid) -> Row {
    let mut row = draft.into_row();
    row.insert("user_id".to_string(), Value::String(owner.to_string()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    #[test]
    fn end_date_on_current_row_is_rejected() {
        let stored = row(json!({ "is_current": true, "end_date": null }));
        let errors = check_patch(&stored, &row(json!({ "end_date": "2024-01-01" }))).unwrap_err();
        assert!(errors.get("end_date").is_some());
    }

    #[test]
    fn end_date_passes_when_current_is_cleared_or_not_set() {
        let current = row(json!({ "is_current": true }));
        let ended = row(json!({ "is_current": false }));
        let closing = row(json!({ "end_date": "2024-01-01", "is_current": false }));
        let end_only = row(json!({ "end_date": "2024-01-01" }));

        assert!(check_patch(&current, &closing).is_ok());
        assert!(check_patch(&ended, &end_only).is_ok());
        assert!(check_patch(&current, &row(json!({ "end_date": null }))).is_ok());
        assert!(!sets_end_date_only(&closing));
        assert!(sets_end_date_only(&end_only));
    }
}
