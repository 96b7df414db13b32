//! Run report (colsync-report.json, stable v1)
//!
//! Breaking changes to the serialized shape require a new major version.

use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What happened to a single catalog column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnStatus {
    /// Description published
    Updated,

    /// Would have been published (dry run)
    Planned,

    /// Nothing to publish (absent or blank comment)
    Skipped,

    /// The update call was rejected
    Failed { error: String },
}

/// Per-column result of a synchronization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOutcome {
    pub column_name: String,
    pub column_id: String,
    #[serde(flatten)]
    pub status: ColumnStatus,
}

impl ColumnOutcome {
    pub fn new(column_name: impl Into<String>, column_id: impl Into<String>, status: ColumnStatus) -> Self {
        Self {
            column_name: column_name.into(),
            column_id: column_id.into(),
            status,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, ColumnStatus::Failed { .. })
    }
}

/// Result of synchronizing one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSyncReport {
    /// Table name as requested
    pub table: String,

    /// Resolved catalog table id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,

    /// Why the table could not be processed at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub columns: Vec<ColumnOutcome>,
}

impl TableSyncReport {
    pub fn completed(table: impl Into<String>, table_id: impl Into<String>, columns: Vec<ColumnOutcome>) -> Self {
        Self {
            table: table.into(),
            table_id: Some(table_id.into()),
            error: None,
            columns,
        }
    }

    pub fn failed(table: impl Into<String>, table_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            table_id,
            error: Some(error.into()),
            columns: Vec::new(),
        }
    }

    pub fn count(&self, pred: impl Fn(&ColumnStatus) -> bool) -> usize {
        self.columns.iter().filter(|c| pred(&c.status)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|s| matches!(s, ColumnStatus::Updated))
    }

    pub fn failures(&self) -> usize {
        self.count(|s| matches!(s, ColumnStatus::Failed { .. }))
    }
}

/// Summary counters across all tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub tables: usize,
    pub tables_failed: usize,
    pub updated: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Report for one `colsync sync` invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    pub dry_run: bool,

    pub summary: ReportSummary,

    pub tables: Vec<TableSyncReport>,
}

impl SyncReport {
    /// Create a new empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            dry_run,
            summary: ReportSummary::default(),
            tables: Vec::new(),
        }
    }

    /// Append a table result and fold it into the summary
    pub fn add_table(&mut self, table: TableSyncReport) {
        self.summary.tables += 1;
        if table.error.is_some() {
            self.summary.tables_failed += 1;
        }

        for column in &table.columns {
            match column.status {
                ColumnStatus::Updated => self.summary.updated += 1,
                ColumnStatus::Planned => self.summary.planned += 1,
                ColumnStatus::Skipped => self.summary.skipped += 1,
                ColumnStatus::Failed { .. } => self.summary.failed += 1,
            }
        }

        self.tables.push(table);
    }

    /// Whether any table or column failed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || self.summary.tables_failed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
