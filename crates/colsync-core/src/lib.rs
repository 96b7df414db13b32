//! colsync core
//!
//! Shared domain model for synchronizing warehouse column comments into the
//! catalog: records exchanged between the warehouse and catalog sides, the
//! error taxonomy, configuration (colsync.toml) and the run report.

pub mod config;
pub mod error;
pub mod model;
pub mod report;

pub use config::{CatalogConfig, Config, ConfigError, Secret, SyncConfig, WarehouseConfig};
pub use error::SyncError;
pub use model::{ColumnDescription, ColumnRecord, JoinedRecord, TableRecord};
pub use report::{ColumnOutcome, ColumnStatus, ReportSummary, ReportVersion, SyncReport, TableSyncReport};
