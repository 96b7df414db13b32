//! Inner join of catalog columns with warehouse comments
//!
//! Column names must match exactly: no case folding, no trimming. The join is
//! one-to-one; if a name repeats on either side only its first occurrence
//! takes part, so the output never exceeds the smaller input.

use colsync_core::{ColumnDescription, ColumnRecord, JoinedRecord};
use std::collections::{HashMap, HashSet};

/// Join catalog columns with warehouse descriptions on column name
///
/// Output follows catalog column order. Unmatched columns on either side are
/// dropped.
pub fn join(catalog_columns: &[ColumnRecord], descriptions: &[ColumnDescription]) -> Vec<JoinedRecord> {
    let mut comments: HashMap<&str, Option<&String>> = HashMap::with_capacity(descriptions.len());
    for desc in descriptions {
        if comments.contains_key(desc.column_name.as_str()) {
            tracing::warn!(column = %desc.column_name, "duplicate warehouse column, keeping the first comment");
            continue;
        }
        comments.insert(desc.column_name.as_str(), desc.comment.as_ref());
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(catalog_columns.len());
    let mut joined = Vec::new();

    for column in catalog_columns {
        if !seen.insert(column.name.as_str()) {
            tracing::warn!(column = %column.name, id = %column.id, "duplicate catalog column, skipping");
            continue;
        }

        match comments.get(column.name.as_str()) {
            Some(comment) => joined.push(JoinedRecord {
                column_name: column.name.clone(),
                column_id: column.id.clone(),
                comment: comment.cloned(),
            }),
            None => tracing::debug!(column = %column.name, "no warehouse column with this name"),
        }
    }

    joined
}
