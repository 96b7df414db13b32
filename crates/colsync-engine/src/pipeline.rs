//! Per-table synchronization pipeline
//!
//! For each table: resolve the catalog id, list catalog columns, read the
//! warehouse comments, join, publish. Tables run one after another; a table
//! that cannot be processed is recorded on the report and the run moves on.

use crate::join::join;
use crate::synchronizer::{synchronize, SyncOptions};
use colsync_catalog::{CatalogApi, CatalogSession, TableResolver};
use colsync_core::{SyncError, SyncReport, TableSyncReport};
use colsync_warehouse::WarehouseAdapter;

/// Which tables a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTargets {
    /// Explicit table names
    Tables(Vec<String>),

    /// Every table the metadata API lists for the configured database
    All,
}

impl SyncTargets {
    /// Expand into concrete table names
    pub fn table_names(&self, resolver: &TableResolver) -> Result<Vec<String>, SyncError> {
        match self {
            SyncTargets::Tables(names) => Ok(names.clone()),
            SyncTargets::All => resolver.table_names().ok_or_else(|| {
                SyncError::ProtocolError(format!(
                    "Cannot list tables of database '{}': the metadata API query failed",
                    resolver.database()
                ))
            }),
        }
    }
}

/// Borrowed sessions and settings for one run
pub struct SyncPipeline<'a> {
    warehouse: &'a dyn WarehouseAdapter,
    catalog: &'a dyn CatalogApi,
    session: &'a CatalogSession,
    resolver: &'a TableResolver,
    options: SyncOptions,
}

impl<'a> SyncPipeline<'a> {
    pub fn new(
        warehouse: &'a dyn WarehouseAdapter,
        catalog: &'a dyn CatalogApi,
        session: &'a CatalogSession,
        resolver: &'a TableResolver,
    ) -> Self {
        Self {
            warehouse,
            catalog,
            session,
            resolver,
            options: SyncOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Synchronize one table
    ///
    /// Never fails: resolution or listing errors end up in the report's
    /// `error` field.
    pub async fn sync_table(&self, table_name: &str) -> TableSyncReport {
        tracing::info!(table = table_name, dry_run = self.options.dry_run, "synchronizing table");

        let table_id = match self.resolver.resolve(self.catalog, self.session, table_name).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(table = table_name, error = %e, "table could not be resolved");
                return TableSyncReport::failed(table_name, None, e.to_string());
            }
        };

        match self.sync_resolved(table_name, &table_id).await {
            Ok(report) => {
                tracing::info!(
                    table = table_name,
                    columns = report.columns.len(),
                    updated = report.updated(),
                    failed = report.failures(),
                    "table done"
                );
                report
            }
            Err(e) => {
                tracing::warn!(table = table_name, table_id = %table_id, error = %e, "table could not be synchronized");
                TableSyncReport::failed(table_name, Some(table_id), e.to_string())
            }
        }
    }

    async fn sync_resolved(&self, table_name: &str, table_id: &str) -> Result<TableSyncReport, SyncError> {
        let catalog_columns = self.catalog.list_columns(self.session, table_id).await?;
        let descriptions = self.warehouse.describe_columns(table_name).await?;

        let joined = join(&catalog_columns, &descriptions);
        tracing::debug!(
            table = table_name,
            catalog_columns = catalog_columns.len(),
            warehouse_columns = descriptions.len(),
            joined = joined.len(),
            "columns joined"
        );

        let outcomes = synchronize(self.catalog, self.session, table_id, &joined, self.options).await;
        Ok(TableSyncReport::completed(table_name, table_id, outcomes))
    }

    /// Synchronize every target table in order
    ///
    /// Fails only when the target list itself cannot be built.
    pub async fn run(&self, targets: &SyncTargets) -> Result<SyncReport, SyncError> {
        let tables = targets.table_names(self.resolver)?;
        let mut report = SyncReport::new(self.options.dry_run);

        if tables.is_empty() {
            tracing::warn!("no tables to synchronize");
        }

        for table in &tables {
            report.add_table(self.sync_table(table).await);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsync_core::TableRecord;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_targets() {
        let resolver = TableResolver::from_tables("SALES", vec![]);
        let targets = SyncTargets::Tables(vec!["ORDERS".to_string()]);
        assert_eq!(targets.table_names(&resolver).unwrap(), vec!["ORDERS"]);
    }

    #[test]
    fn test_all_targets_from_metadata() {
        let resolver = TableResolver::from_tables(
            "SALES",
            vec![TableRecord::new("ORDERS", "1"), TableRecord::new("CUSTOMERS", "2")],
        );
        assert_eq!(SyncTargets::All.table_names(&resolver).unwrap(), vec!["ORDERS", "CUSTOMERS"]);
    }
}
