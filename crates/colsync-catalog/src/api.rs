//! Catalog API trait and session types

use colsync_core::{CatalogConfig, ColumnRecord, Secret, SyncError, TableRecord};
use std::fmt;

/// Long-lived credentials exchanged for a session at sign-in
#[derive(Debug, Clone)]
pub struct CatalogCredentials {
    /// Personal access token name
    pub token_name: String,

    /// Personal access token secret
    pub token_secret: Secret,

    /// Site content URL; empty for the default site
    pub site: String,
}

impl CatalogCredentials {
    pub fn new(token_name: impl Into<String>, token_secret: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token_secret: Secret::new(token_secret),
            site: site.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            token_name: config.token_name.clone(),
            token_secret: config.token_secret.clone(),
            site: config.site.clone(),
        }
    }
}

/// Short-lived session token issued at sign-in
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(***)")
    }
}

/// An authenticated catalog session
///
/// The server expires the token after an unspecified timeout; it is never
/// refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSession {
    pub token: SessionToken,
    pub site_id: String,
}

impl CatalogSession {
    pub fn new(token: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            token: SessionToken::new(token),
            site_id: site_id.into(),
        }
    }
}

/// Operations the synchronizer needs from a catalog server
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    /// Get the client name (e.g., "Tableau")
    fn name(&self) -> &'static str;

    /// Exchange credentials for a session token and site id
    async fn sign_in(&self, credentials: &CatalogCredentials) -> Result<CatalogSession, SyncError>;

    /// Invalidate the session token
    async fn sign_out(&self, session: &CatalogSession) -> Result<(), SyncError>;

    /// Every table under the named warehouse database, via the metadata API
    async fn list_tables_by_database(
        &self,
        session: &CatalogSession,
        database: &str,
    ) -> Result<Vec<TableRecord>, SyncError>;

    /// Every table on the site, via the REST listing (all pages)
    async fn list_site_tables(&self, session: &CatalogSession) -> Result<Vec<TableRecord>, SyncError>;

    /// Every column of a table (all pages)
    async fn list_columns(
        &self,
        session: &CatalogSession,
        table_id: &str,
    ) -> Result<Vec<ColumnRecord>, SyncError>;

    /// Replace a column's description
    async fn update_column_description(
        &self,
        session: &CatalogSession,
        table_id: &str,
        column_id: &str,
        description: &str,
    ) -> Result<(), SyncError>;
}
