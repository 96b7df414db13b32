//! Configuration schema (colsync.toml)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default REST API version used for catalog calls
pub const DEFAULT_API_VERSION: &str = "3.13";

/// Default connector type used to filter catalog databases
pub const DEFAULT_CONNECTION_TYPE: &str = "snowflake";

/// Default page size for paginated catalog listings
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// A credential value that never shows up in debug output or logs
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value (only for handing to a client)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(***)")
        }
    }
}

/// Warehouse (Snowflake) connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Account identifier (e.g. "xy12345.us-east-1")
    #[serde(default)]
    pub account: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: Secret,

    /// Database whose information schema holds the comments
    #[serde(default)]
    pub database: String,

    /// Virtual warehouse to run the query on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Restrict information_schema rows to one schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Catalog (Tableau) connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Server base URL (e.g. "https://demo.tableau.com")
    #[serde(default)]
    pub server: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Site content URL; empty for the default site
    #[serde(default)]
    pub site: String,

    /// Personal access token name
    #[serde(default)]
    pub token_name: String,

    /// Personal access token secret
    #[serde(default)]
    pub token_secret: Secret,

    /// Connector type used to filter databases in the metadata API
    #[serde(default = "default_connection_type")]
    pub connection_type: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_connection_type() -> String {
    DEFAULT_CONNECTION_TYPE.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            api_version: default_api_version(),
            site: String::new(),
            token_name: String::new(),
            token_secret: Secret::default(),
            connection_type: default_connection_type(),
            page_size: default_page_size(),
        }
    }
}

/// What to synchronize
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Tables to synchronize when none are given on the command line
    #[serde(default)]
    pub tables: Vec<String>,

    /// Resolve and join but do not publish
    #[serde(default)]
    pub dry_run: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Override settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override settings from an arbitrary variable lookup
    ///
    /// Empty values are ignored so that an exported-but-blank variable does
    /// not wipe a value from the file.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("SNOWFLAKE_ACCOUNT") {
            self.warehouse.account = v;
        }
        if let Some(v) = get("SNOWFLAKE_USER") {
            self.warehouse.user = v;
        }
        if let Some(v) = get("SNOWFLAKE_PASSWORD") {
            self.warehouse.password = Secret::new(v);
        }
        if let Some(v) = get("SNOWFLAKE_DATABASE") {
            self.warehouse.database = v;
        }
        if let Some(v) = get("TABLEAU_SERVER") {
            self.catalog.server = v;
        }
        if let Some(v) = get("TABLEAU_SITE") {
            self.catalog.site = v;
        }
        if let Some(v) = get("TABLEAU_PAT_NAME") {
            self.catalog.token_name = v;
        }
        if let Some(v) = get("TABLEAU_PAT_SECRET") {
            self.catalog.token_secret = Secret::new(v);
        }
    }

    /// Check that every setting needed for a run is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, bool); 7] = [
            ("warehouse.account", self.warehouse.account.is_empty()),
            ("warehouse.user", self.warehouse.user.is_empty()),
            ("warehouse.password", self.warehouse.password.is_empty()),
            ("warehouse.database", self.warehouse.database.is_empty()),
            ("catalog.server", self.catalog.server.is_empty()),
            ("catalog.token_name", self.catalog.token_name.is_empty()),
            ("catalog.token_secret", self.catalog.token_secret.is_empty()),
        ];

        if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(ConfigError::MissingField(*field));
        }

        if self.catalog.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.page_size",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Starter config written by `colsync init`
    pub fn template() -> Self {
        Self {
            warehouse: WarehouseConfig {
                account: "xy12345.us-east-1".to_string(),
                user: "SYNC_USER".to_string(),
                database: "ANALYTICS".to_string(),
                warehouse: Some("COMPUTE_WH".to_string()),
                ..WarehouseConfig::default()
            },
            catalog: CatalogConfig {
                server: "https://tableau.example.com".to_string(),
                token_name: "colsync".to_string(),
                ..CatalogConfig::default()
            },
            sync: SyncConfig::default(),
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Missing required setting '{0}' (set it in colsync.toml or the environment)")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}
