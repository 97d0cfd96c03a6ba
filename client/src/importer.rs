//! Helpers for importers that keep Biz Ops in sync with another source.
//!
//! A typical import fetches the source data and the existing Biz Ops
//! records, diffs them with [`compare_records_by_code`], then sends the
//! creates and updates through
//! [`BizOpsClient::batch_patch_records`](crate::BizOpsClient::batch_patch_records)
//! and the deletes through
//! [`BizOpsClient::batch_delete_records`](crate::BizOpsClient::batch_delete_records).

use serde_json::Value;
use std::collections::HashSet;

/// A record identified by its Biz Ops `code`.
pub trait HasCode {
    fn code(&self) -> Option<&str>;
}

impl HasCode for Value {
    fn code(&self) -> Option<&str> {
        self.get("code").and_then(Value::as_str)
    }
}

impl HasCode for String {
    fn code(&self) -> Option<&str> {
        Some(self)
    }
}

/// What an import needs to do to make Biz Ops match its source.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordActions<T> {
    /// Source records with no existing counterpart
    pub creates: Vec<T>,
    /// Source records that already exist, in their source version
    pub updates: Vec<T>,
    /// Existing records missing from the source
    pub deletes: Vec<T>,
}

impl<T> Default for RecordActions<T> {
    fn default() -> Self {
        Self {
            creates: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
        }
    }
}

impl<T> RecordActions<T> {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

impl<T: HasCode> RecordActions<T> {
    /// Codes of the records to delete, ready for a batch delete
    pub fn delete_codes(&self) -> Vec<String> {
        self.deletes
            .iter()
            .filter_map(|record| record.code().map(str::to_string))
            .collect()
    }
}

/// Diff `source` records against `existing` Biz Ops records by code.
///
/// Output keeps input order. Records without a code cannot be matched and
/// are skipped.
pub fn compare_records_by_code<T: HasCode>(source: Vec<T>, existing: Vec<T>) -> RecordActions<T> {
    let source_codes: HashSet<String> = source
        .iter()
        .filter_map(|record| record.code().map(str::to_string))
        .collect();
    let existing_codes: HashSet<String> = existing
        .iter()
        .filter_map(|record| record.code().map(str::to_string))
        .collect();

    let mut actions = RecordActions::default();
    let mut skipped = 0;

    for record in source {
        match record.code().map(|code| existing_codes.contains(code)) {
            Some(true) => actions.updates.push(record),
            Some(false) => actions.creates.push(record),
            None => skipped += 1,
        }
    }

    for record in existing {
        match record.code().map(|code| source_codes.contains(code)) {
            Some(false) => actions.deletes.push(record),
            Some(true) => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} records without a code");
    }

    log::info!(
        "Found {} records to create, {} to update and {} to delete",
        actions.creates.len(),
        actions.updates.len(),
        actions.deletes.len()
    );

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_records_by_code() {
        let source = vec![
            json!({ "code": "a", "name": "A (new)" }),
            json!({ "code": "b", "name": "B" }),
            json!({ "code": "c", "name": "C" }),
        ];
        let existing = vec![
            json!({ "code": "a", "name": "A (old)" }),
            json!({ "code": "d", "name": "D" }),
            json!({ "code": "c", "name": "C" }),
        ];

        let actions = compare_records_by_code(source, existing);

        assert_eq!(actions.creates, vec![json!({ "code": "b", "name": "B" })]);
        assert_eq!(
            actions.updates,
            vec![
                json!({ "code": "a", "name": "A (new)" }),
                json!({ "code": "c", "name": "C" }),
            ]
        );
        assert_eq!(actions.deletes, vec![json!({ "code": "d", "name": "D" })]);
        assert_eq!(actions.delete_codes(), vec!["d".to_string()]);
    }

    #[test]
    fn test_records_without_code_are_skipped() {
        let source = vec![json!({ "name": "nameless" }), json!({ "code": "a" })];
        let existing = vec![json!({ "code": 42 })];

        let actions = compare_records_by_code(source, existing);

        assert_eq!(actions.creates, vec![json!({ "code": "a" })]);
        assert!(actions.updates.is_empty());
        assert!(actions.deletes.is_empty());
    }

    #[test]
    fn test_compare_codes() {
        let source = vec!["a".to_string(), "b".to_string()];
        let existing = vec!["b".to_string(), "c".to_string()];

        let actions = compare_records_by_code(source, existing);

        assert_eq!(actions.creates, vec!["a".to_string()]);
        assert_eq!(actions.updates, vec!["b".to_string()]);
        assert_eq!(actions.deletes, vec!["c".to_string()]);
    }

    #[test]
    fn test_identical_sets_only_update() {
        let records = vec![json!({ "code": "a" }), json!({ "code": "b" })];

        let actions = compare_records_by_code(records.clone(), records.clone());

        assert!(actions.creates.is_empty());
        assert!(actions.deletes.is_empty());
        assert_eq!(actions.updates, records);
        assert!(!actions.is_empty());
        assert!(RecordActions::<Value>::default().is_empty());
    }
}
