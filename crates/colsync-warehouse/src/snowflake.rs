//! Snowflake warehouse adapter using INFORMATION_SCHEMA
//!
//! Reads `COLUMN_NAME` and `COMMENT` from INFORMATION_SCHEMA.COLUMNS. It
//! requires appropriate privileges:
//! - USAGE on the database and schema
//! - SELECT on INFORMATION_SCHEMA views
//!
//! Authentication is by username and password.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let adapter = SnowflakeAdapter::new("xy12345.us-east-1", "username", "password")
//!     .with_database("ANALYTICS")
//!     .with_warehouse("COMPUTE_WH")
//!     .open()
//!     .await?;
//! ```
//!
//! Reference: https://docs.snowflake.com/en/sql-reference/info-schema/columns

use crate::adapter::WarehouseAdapter;
#[cfg(feature = "snowflake")]
use crate::sql::describe_columns_query;
use colsync_core::{ColumnDescription, Secret, SyncError};

#[cfg(feature = "snowflake")]
use snowflake_api::SnowflakeApi;

#[cfg(feature = "snowflake")]
use arrow_array::cast::AsArray;

#[cfg(feature = "snowflake")]
use arrow_array::{Array, RecordBatch};

/// Builder for SnowflakeAdapter
#[derive(Debug, Clone)]
pub struct SnowflakeAdapterBuilder {
    account: String,
    username: String,
    password: Secret,
    warehouse: Option<String>,
    role: Option<String>,
    database: Option<String>,
    schema: Option<String>,
}

impl SnowflakeAdapterBuilder {
    /// Create new builder with password authentication
    pub fn with_password(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            username: username.into(),
            password: Secret::new(password),
            warehouse: None,
            role: None,
            database: None,
            schema: None,
        }
    }

    /// Set the warehouse to use
    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    /// Set the role to use
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the database whose information schema is queried
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Restrict information_schema rows to one schema
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Build the adapter and verify the credentials with a probe query
    pub async fn open(self) -> Result<SnowflakeAdapter, SyncError> {
        let adapter = self.build()?;
        adapter.test_connection().await?;
        tracing::debug!(account = %adapter.account, "Snowflake session opened");
        Ok(adapter)
    }

    /// Build the adapter without contacting the warehouse
    #[cfg(feature = "snowflake")]
    pub fn build(self) -> Result<SnowflakeAdapter, SyncError> {
        let api = SnowflakeApi::with_password_auth(
            &self.account,
            self.warehouse.as_deref(),
            self.database.as_deref(),
            self.schema.as_deref(),
            &self.username,
            self.role.as_deref(),
            self.password.expose(),
        )
        .map_err(|e| SyncError::AuthenticationError(format!(
            "Failed to set up Snowflake password auth: {}",
            e
        )))?;

        Ok(SnowflakeAdapter {
            api,
            account: self.account,
            schema: self.schema,
        })
    }

    /// Build without snowflake feature
    #[cfg(not(feature = "snowflake"))]
    pub fn build(self) -> Result<SnowflakeAdapter, SyncError> {
        Err(not_compiled())
    }
}

#[cfg(not(feature = "snowflake"))]
fn not_compiled() -> SyncError {
    SyncError::ConfigError(
        "Snowflake support not compiled. Rebuild with: cargo build --features snowflake".to_string(),
    )
}

/// Snowflake warehouse adapter
pub struct SnowflakeAdapter {
    #[cfg(feature = "snowflake")]
    api: SnowflakeApi,

    account: String,

    #[cfg(feature = "snowflake")]
    schema: Option<String>,
}

impl SnowflakeAdapter {
    /// Create a new Snowflake adapter with password authentication (returns builder)
    pub fn new(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> SnowflakeAdapterBuilder {
        SnowflakeAdapterBuilder::with_password(account, username, password)
    }

    /// Map a driver error message onto the shared taxonomy
    ///
    /// The driver only exposes errors as text, so classification is by
    /// well-known fragments of Snowflake and transport messages.
    pub fn classify_error(message: &str) -> SyncError {
        let lower = message.to_lowercase();

        let auth = [
            "incorrect username or password",
            "authentication",
            "invalid jwt",
            "jwt token is invalid",
            "user temporarily locked",
            "390100",
            "390144",
        ];
        let network = [
            "error sending request",
            "connection refused",
            "connection reset",
            "timed out",
            "dns error",
            "failed to lookup address",
            "tcp connect",
        ];

        if auth.iter().any(|needle| lower.contains(needle)) {
            SyncError::AuthenticationError(message.to_string())
        } else if network.iter().any(|needle| lower.contains(needle)) {
            SyncError::ConnectivityError(message.to_string())
        } else {
            SyncError::ProtocolError(message.to_string())
        }
    }

    /// Convert one Arrow batch of (COLUMN_NAME, COMMENT) rows
    #[cfg(feature = "snowflake")]
    fn rows_from_batch(batch: &RecordBatch) -> Result<Vec<ColumnDescription>, SyncError> {
        let schema = batch.schema();

        let name_idx = schema.index_of("COLUMN_NAME")
            .map_err(|_| SyncError::ProtocolError("Missing COLUMN_NAME column".to_string()))?;
        let comment_idx = schema.index_of("COMMENT")
            .map_err(|_| SyncError::ProtocolError("Missing COMMENT column".to_string()))?;

        let names = batch.column(name_idx).as_string_opt::<i32>()
            .ok_or_else(|| SyncError::ProtocolError("COLUMN_NAME is not a string column".to_string()))?;
        // an all-NULL COMMENT column can arrive with a null data type
        let comments = batch.column(comment_idx).as_string_opt::<i32>();

        let mut rows = Vec::with_capacity(batch.num_rows());
        for row_idx in 0..batch.num_rows() {
            if names.is_null(row_idx) {
                continue;
            }

            let comment = comments
                .filter(|arr| !arr.is_null(row_idx))
                .map(|arr| arr.value(row_idx));

            rows.push(ColumnDescription::new(names.value(row_idx), comment));
        }

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl WarehouseAdapter for SnowflakeAdapter {
    fn name(&self) -> &'static str {
        "Snowflake"
    }

    #[cfg(feature = "snowflake")]
    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescription>, SyncError> {
        use snowflake_api::QueryResult;

        let query = describe_columns_query(table_name, self.schema.as_deref());
        tracing::debug!(table = table_name, "querying INFORMATION_SCHEMA.COLUMNS");

        let result = self.api.exec(&query)
            .await
            .map_err(|e| Self::classify_error(&e.to_string()))?;

        let mut rows = Vec::new();
        match result {
            QueryResult::Arrow(batches) => {
                for batch in &batches {
                    rows.extend(Self::rows_from_batch(batch)?);
                }
            }
            QueryResult::Json(_) => {
                return Err(SyncError::ProtocolError(
                    "Unexpected JSON result format".to_string()
                ));
            }
            QueryResult::Empty => {}
        }

        tracing::debug!(table = table_name, columns = rows.len(), "warehouse columns described");
        Ok(rows)
    }

    #[cfg(not(feature = "snowflake"))]
    async fn describe_columns(&self, _table_name: &str) -> Result<Vec<ColumnDescription>, SyncError> {
        Err(not_compiled())
    }

    #[cfg(feature = "snowflake")]
    async fn test_connection(&self) -> Result<(), SyncError> {
        self.api.exec("SELECT 1")
            .await
            .map_err(|e| Self::classify_error(&format!("Connection test failed for {}: {}", self.account, e)))?;
        Ok(())
    }

    #[cfg(not(feature = "snowflake"))]
    async fn test_connection(&self) -> Result<(), SyncError> {
        Err(not_compiled())
    }
}
