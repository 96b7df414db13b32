//! Warehouse adapter trait for reading column comments

use colsync_core::{ColumnDescription, SyncError};

/// Trait for warehouse adapters that can describe a table's columns
#[async_trait::async_trait]
pub trait WarehouseAdapter: Send + Sync {
    /// Get the adapter name (e.g., "Snowflake")
    fn name(&self) -> &'static str;

    /// Fetch column names and comments for a table
    ///
    /// Queries INFORMATION_SCHEMA.COLUMNS filtered by table name. An unknown
    /// table yields an empty list, not an error.
    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescription>, SyncError>;

    /// Test the connection to the warehouse
    ///
    /// Used to validate credentials before any catalog call is made.
    async fn test_connection(&self) -> Result<(), SyncError>;
}
