//! Mock warehouse adapter for testing
//!
//! Returns predefined column comments without connecting to any warehouse.
//! It's useful for:
//! - Unit testing the join/synchronize pipeline
//! - Dry runs and demos without real credentials
//! - Simulating per-table query failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use colsync_warehouse::{MockWarehouse, WarehouseAdapter};
//! use colsync_core::ColumnDescription;
//!
//! let warehouse = MockWarehouse::new();
//! warehouse.add_table("ORDERS", vec![
//!     ColumnDescription::new("ID", Some("Order identifier")),
//!     ColumnDescription::new("STATUS", None),
//! ]).await;
//!
//! let rows = warehouse.describe_columns("ORDERS").await?;
//! ```

use crate::adapter::WarehouseAdapter;
use colsync_core::{ColumnDescription, SyncError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock warehouse adapter for testing
///
/// Tables are keyed by exact name. Unknown tables describe as zero rows, the
/// same as an information-schema query that matches nothing.
#[derive(Clone)]
pub struct MockWarehouse {
    /// Column comments by table name
    tables: Arc<RwLock<HashMap<String, Vec<ColumnDescription>>>>,

    /// Errors to return for specific tables
    errors: Arc<RwLock<HashMap<String, SyncError>>>,

    /// Simulate connection failure
    fail_connection: bool,

    /// Number of describe_columns calls, for assertions
    queries: Arc<RwLock<Vec<String>>>,
}

impl MockWarehouse {
    /// Create a new mock warehouse with no tables
    pub fn new() -> Self {
        MockWarehouseBuilder::new().build()
    }

    /// Add (or replace) the column comments for a table
    pub async fn add_table(&self, table_name: impl Into<String>, columns: Vec<ColumnDescription>) {
        self.tables.write().await.insert(table_name.into(), columns);
    }

    /// Configure an error to be returned for a specific table
    pub async fn add_error_for_table(&self, table_name: impl Into<String>, error: SyncError) {
        self.errors.write().await.insert(table_name.into(), error);
    }

    /// Configure to fail all connection tests
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Table names passed to describe_columns so far, in call order
    pub async fn queried_tables(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }
}

impl Default for MockWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WarehouseAdapter for MockWarehouse {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescription>, SyncError> {
        self.queries.write().await.push(table_name.to_string());

        if let Some(error) = self.errors.read().await.get(table_name) {
            return Err(error.clone());
        }

        Ok(self
            .tables
            .read()
            .await
            .get(table_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<(), SyncError> {
        if self.fail_connection {
            Err(SyncError::ConnectivityError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Builder for creating MockWarehouse with several tables
///
/// ```rust,ignore
/// let warehouse = MockWarehouseBuilder::new()
///     .with_table("ORDERS", vec![ColumnDescription::new("ID", Some("Order id"))])
///     .with_error("SECRET", SyncError::AuthenticationError("denied".into()))
///     .build();
/// ```
#[derive(Default)]
pub struct MockWarehouseBuilder {
    tables: HashMap<String, Vec<ColumnDescription>>,
    errors: HashMap<String, SyncError>,
    fail_connection: bool,
}

impl MockWarehouseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add column comments for a table
    pub fn with_table(mut self, table_name: &str, columns: Vec<ColumnDescription>) -> Self {
        self.tables.insert(table_name.to_string(), columns);
        self
    }

    /// Add an error for a specific table
    pub fn with_error(mut self, table_name: &str, error: SyncError) -> Self {
        self.errors.insert(table_name.to_string(), error);
        self
    }

    /// Configure connection failure
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    pub fn build(self) -> MockWarehouse {
        MockWarehouse {
            tables: Arc::new(RwLock::new(self.tables)),
            errors: Arc::new(RwLock::new(self.errors)),
            fail_connection: self.fail_connection,
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}
