//! Publishing joined descriptions to the catalog

use colsync_catalog::{CatalogApi, CatalogSession};
use colsync_core::{ColumnOutcome, ColumnStatus, JoinedRecord, SyncError};

/// Options for a synchronization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report what would be published without calling the catalog
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Publish one column description
///
/// The text is sent verbatim; the request body is serialized as JSON so no
/// escaping is needed here.
pub async fn publish_description(
    catalog: &dyn CatalogApi,
    session: &CatalogSession,
    table_id: &str,
    column_id: &str,
    text: &str,
) -> Result<(), SyncError> {
    tracing::debug!(table_id, column_id, chars = text.chars().count(), "publishing description");
    catalog.update_column_description(session, table_id, column_id, text).await
}

/// Push every publishable comment in `records` to the catalog
///
/// Absent and blank comments are skipped without a catalog call. A rejected
/// update is recorded on its column and the remaining columns still run.
pub async fn synchronize(
    catalog: &dyn CatalogApi,
    session: &CatalogSession,
    table_id: &str,
    records: &[JoinedRecord],
    options: SyncOptions,
) -> Vec<ColumnOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let status = match record.publishable_comment() {
            None => {
                tracing::debug!(column = %record.column_name, "no comment to publish");
                ColumnStatus::Skipped
            }
            Some(_) if options.dry_run => ColumnStatus::Planned,
            Some(text) => match publish_description(catalog, session, table_id, &record.column_id, text).await {
                Ok(()) => ColumnStatus::Updated,
                Err(e) => {
                    tracing::warn!(column = %record.column_name, column_id = %record.column_id, error = %e, "description update failed");
                    ColumnStatus::Failed { error: e.to_string() }
                }
            },
        };

        outcomes.push(ColumnOutcome::new(&record.column_name, &record.column_id, status));
    }

    outcomes
}
