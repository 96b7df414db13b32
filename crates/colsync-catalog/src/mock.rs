//! In-memory catalog for testing
//!
//! Behaves like a catalog server closely enough to exercise sign-in, table
//! resolution, column listing and description updates without a network:
//! - only the configured token secret signs in
//! - every call checks the session token it was given
//! - selected columns can be made to reject updates
//! - every accepted update is recorded for assertions
//!
//! ## Usage
//!
//! ```rust,ignore
//! let catalog = MockCatalogBuilder::new()
//!     .with_token_secret("pat")
//!     .with_table(TableRecord::new("ORDERS", "t-1").with_luid("t-1"), vec![
//!         ColumnRecord::new("ORDER_ID", "c-1"),
//!     ])
//!     .with_rejected_column("c-1")
//!     .build();
//! ```

use crate::api::{CatalogApi, CatalogCredentials, CatalogSession};
use colsync_core::{ColumnRecord, SyncError, TableRecord};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

const MOCK_TOKEN: &str = "mock-session-token";
const MOCK_SITE_ID: &str = "mock-site";

/// A description update the mock accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDescription {
    pub table_id: String,
    pub column_id: String,
    pub description: String,
}

#[derive(Default)]
struct MockState {
    /// Columns by table REST id
    columns: HashMap<String, Vec<ColumnRecord>>,
    published: Vec<PublishedDescription>,
    update_attempts: usize,
    signed_out: bool,
}

/// In-memory catalog implementing [`CatalogApi`]
#[derive(Clone)]
pub struct MockCatalog {
    token_secret: String,
    /// REST site listing
    site_tables: Vec<TableRecord>,
    /// Metadata API listing by database name
    databases: HashMap<String, Vec<TableRecord>>,
    metadata_error: Option<SyncError>,
    rejected_columns: HashSet<String>,
    state: Arc<RwLock<MockState>>,
}

impl MockCatalog {
    /// All accepted description updates, in call order
    pub async fn published(&self) -> Vec<PublishedDescription> {
        self.state.read().await.published.clone()
    }

    /// Number of update calls received, accepted or not
    pub async fn update_attempts(&self) -> usize {
        self.state.read().await.update_attempts
    }

    /// Current description of a column
    pub async fn description_of(&self, table_id: &str, column_id: &str) -> Option<String> {
        self.state
            .read()
            .await
            .columns
            .get(table_id)?
            .iter()
            .find(|c| c.id == column_id)?
            .description
            .clone()
    }

    pub async fn is_signed_out(&self) -> bool {
        self.state.read().await.signed_out
    }

    async fn check_session(&self, session: &CatalogSession) -> Result<(), SyncError> {
        if session.token.as_str() != MOCK_TOKEN || session.site_id != MOCK_SITE_ID {
            return Err(SyncError::AuthenticationError("Invalid authentication credentials".to_string()));
        }
        if self.state.read().await.signed_out {
            return Err(SyncError::AuthenticationError("Session has been signed out".to_string()));
        }
        Ok(())
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        MockCatalogBuilder::new().build()
    }
}

#[async_trait::async_trait]
impl CatalogApi for MockCatalog {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn sign_in(&self, credentials: &CatalogCredentials) -> Result<CatalogSession, SyncError> {
        if credentials.token_secret.expose() != self.token_secret {
            return Err(SyncError::AuthenticationError(format!(
                "Sign-in returned HTTP 401: personal access token '{}' was rejected",
                credentials.token_name
            )));
        }
        self.state.write().await.signed_out = false;
        Ok(CatalogSession::new(MOCK_TOKEN, MOCK_SITE_ID))
    }

    async fn sign_out(&self, session: &CatalogSession) -> Result<(), SyncError> {
        self.check_session(session).await?;
        self.state.write().await.signed_out = true;
        Ok(())
    }

    async fn list_tables_by_database(
        &self,
        session: &CatalogSession,
        database: &str,
    ) -> Result<Vec<TableRecord>, SyncError> {
        self.check_session(session).await?;

        if let Some(error) = &self.metadata_error {
            return Err(error.clone());
        }

        match self.databases.get(database) {
            Some(tables) => Ok(tables.clone()),
            None => Err(SyncError::ProtocolError(format!(
                "Metadata query returned no database named '{}'",
                database
            ))),
        }
    }

    async fn list_site_tables(&self, session: &CatalogSession) -> Result<Vec<TableRecord>, SyncError> {
        self.check_session(session).await?;
        Ok(self.site_tables.clone())
    }

    async fn list_columns(
        &self,
        session: &CatalogSession,
        table_id: &str,
    ) -> Result<Vec<ColumnRecord>, SyncError> {
        self.check_session(session).await?;

        self.state
            .read()
            .await
            .columns
            .get(table_id)
            .cloned()
            .ok_or_else(|| SyncError::NotFoundError(format!("Column listing returned HTTP 404: table '{}'", table_id)))
    }

    async fn update_column_description(
        &self,
        session: &CatalogSession,
        table_id: &str,
        column_id: &str,
        description: &str,
    ) -> Result<(), SyncError> {
        self.check_session(session).await?;

        let mut state = self.state.write().await;
        state.update_attempts += 1;

        if self.rejected_columns.contains(column_id) {
            return Err(SyncError::ProtocolError(format!(
                "Column update returned HTTP 400: column '{}' rejected",
                column_id
            )));
        }

        let column = state
            .columns
            .get_mut(table_id)
            .and_then(|cols| cols.iter_mut().find(|c| c.id == column_id))
            .ok_or_else(|| SyncError::NotFoundError(format!("Column update returned HTTP 404: column '{}'", column_id)))?;
        column.description = Some(description.to_string());

        state.published.push(PublishedDescription {
            table_id: table_id.to_string(),
            column_id: column_id.to_string(),
            description: description.to_string(),
        });
        Ok(())
    }
}

/// Builder for [`MockCatalog`]
pub struct MockCatalogBuilder {
    token_secret: String,
    site_tables: Vec<TableRecord>,
    databases: HashMap<String, Vec<TableRecord>>,
    metadata_error: Option<SyncError>,
    rejected_columns: HashSet<String>,
    columns: HashMap<String, Vec<ColumnRecord>>,
}

impl MockCatalogBuilder {
    pub fn new() -> Self {
        Self {
            token_secret: "secret".to_string(),
            site_tables: Vec::new(),
            databases: HashMap::new(),
            metadata_error: None,
            rejected_columns: HashSet::new(),
            columns: HashMap::new(),
        }
    }

    /// The only personal access token secret that signs in
    pub fn with_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = secret.into();
        self
    }

    /// Add a table to the REST site listing, with its columns
    ///
    /// The table must carry a LUID; its columns are keyed by it.
    pub fn with_table(mut self, table: TableRecord, columns: Vec<ColumnRecord>) -> Self {
        let key = table.rest_id().unwrap_or(&table.id).to_string();
        self.columns.insert(key, columns);
        self.site_tables.push(table);
        self
    }

    /// Make the metadata API report `tables` for `database`
    pub fn with_database(mut self, database: &str, tables: Vec<TableRecord>) -> Self {
        let tables = tables
            .into_iter()
            .map(|t| if t.database.is_some() { t } else { t.with_database(database) })
            .collect();
        self.databases.insert(database.to_string(), tables);
        self
    }

    /// Make every metadata query fail with `error`
    pub fn with_metadata_error(mut self, error: SyncError) -> Self {
        self.metadata_error = Some(error);
        self
    }

    /// Make updates to this column id fail
    pub fn with_rejected_column(mut self, column_id: &str) -> Self {
        self.rejected_columns.insert(column_id.to_string());
        self
    }

    pub fn build(self) -> MockCatalog {
        MockCatalog {
            token_secret: self.token_secret,
            site_tables: self.site_tables,
            databases: self.databases,
            metadata_error: self.metadata_error,
            rejected_columns: self.rejected_columns,
            state: Arc::new(RwLock::new(MockState {
                columns: self.columns,
                ..MockState::default()
            })),
        }
    }
}

impl Default for MockCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
