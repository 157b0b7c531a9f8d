//! Read-time migration for records written by older versions.
//!
//! Older records named the project `projectTitle` instead of `name`, and some
//! lack `lastModified`. Both are repaired on the raw JSON before it is turned
//! into a [`shared_types::ProjectSnapshot`], so the typed model never has to
//! know about them.

use chrono::{DateTime, Utc};
use serde_json::Value;

const LEGACY_NAME_FIELD: &str = "projectTitle";

/// Bring a stored record up to the current shape. `last_modified_micros` is
/// the row's indexed timestamp, used when the record has none of its own.
pub fn migrate(mut record: Value, last_modified_micros: i64) -> Value {
    let Some(fields) = record.as_object_mut() else {
        return record;
    };

    if !has_text(fields.get("name")) {
        let legacy_title = fields
            .get(LEGACY_NAME_FIELD)
            .filter(|v| has_text(Some(*v)))
            .cloned();
        if let Some(title) = legacy_title {
            fields.insert("name".to_string(), title);
        }
    }

    if fields.get("lastModified").map_or(true, Value::is_null) {
        if let Some(ts) = DateTime::<Utc>::from_timestamp_micros(last_modified_micros) {
            fields.insert("lastModified".to_string(), Value::String(ts.to_rfc3339()));
        }
    }

    record
}

/// Structural check applied before listing: a non-empty id and name plus
/// array-typed collections. Anything else is treated as drift and skipped.
pub fn is_structurally_valid(record: &Value) -> bool {
    let Some(fields) = record.as_object() else {
        return false;
    };

    has_text(fields.get("id"))
        && has_text(fields.get("name"))
        && ["tasks", "resources", "issues", "timelineDates"]
            .iter()
            .all(|key| fields.get(*key).is_some_and(Value::is_array))
}

fn has_text(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "id": "project_1",
            "name": "Current",
            "tasks": [],
            "resources": [],
            "issues": [],
            "timelineDates": [],
            "lastModified": "2026-01-02T03:04:05Z"
        })
    }

    #[test]
    fn test_legacy_title_becomes_name() {
        let mut record = base();
        record.as_object_mut().unwrap().remove("name");
        record["projectTitle"] = json!("Old Title");

        let migrated = migrate(record, 0);
        assert_eq!(migrated["name"], "Old Title");
        assert!(is_structurally_valid(&migrated));
    }

    #[test]
    fn test_current_name_wins_over_legacy_title() {
        let mut record = base();
        record["projectTitle"] = json!("Old Title");

        let migrated = migrate(record, 0);
        assert_eq!(migrated["name"], "Current");
    }

    #[test]
    fn test_missing_last_modified_filled_from_column() {
        let mut record = base();
        record.as_object_mut().unwrap().remove("lastModified");

        let migrated = migrate(record, 1_767_225_600_000_000);
        let ts = migrated["lastModified"].as_str().unwrap();
        assert!(ts.starts_with("2026-01-01T00:00:00"));
    }

    #[test]
    fn test_existing_last_modified_untouched() {
        let migrated = migrate(base(), 0);
        assert_eq!(migrated["lastModified"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn test_structural_validation() {
        assert!(is_structurally_valid(&base()));

        let mut no_id = base();
        no_id["id"] = json!("");
        assert!(!is_structurally_valid(&no_id));

        let mut no_name = base();
        no_name.as_object_mut().unwrap().remove("name");
        assert!(!is_structurally_valid(&no_name));

        let mut tasks_not_array = base();
        tasks_not_array["tasks"] = json!({});
        assert!(!is_structurally_valid(&tasks_not_array));

        let mut missing_dates = base();
        missing_dates.as_object_mut().unwrap().remove("timelineDates");
        assert!(!is_structurally_valid(&missing_dates));

        assert!(!is_structurally_valid(&json!([1, 2, 3])));
    }

    #[test]
    fn test_non_object_passes_through() {
        assert_eq!(migrate(json!("text"), 0), json!("text"));
    }
}
