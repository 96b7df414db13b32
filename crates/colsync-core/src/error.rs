//! Error taxonomy shared by the warehouse, catalog and engine crates

/// Errors raised while talking to the warehouse or the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Credentials or session token were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Network or transport failure
    #[error("Connectivity error: {0}")]
    ConnectivityError(String),

    /// Response shape did not match expectations
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// No matching table or column
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// More than one object carries the requested name
    #[error("Ambiguous name '{name}': {} candidates ({})", .candidates.len(), .candidates.join(", "))]
    AmbiguousMatchError {
        name: String,
        candidates: Vec<String>,
    },

    /// Missing or invalid local configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    /// Whether this error should abort the whole run rather than a single table
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::AuthenticationError(_) | SyncError::ConnectivityError(_) | SyncError::ConfigError(_)
        )
    }
}
