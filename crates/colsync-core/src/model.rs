//! Records exchanged between the warehouse and catalog sides

use serde::{Deserialize, Serialize};

/// A table known to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Table name, unique within a warehouse database
    pub name: String,

    /// Catalog identifier (metadata API id, or REST id for REST listings)
    pub id: String,

    /// Logical unique identifier used by the REST endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luid: Option<String>,

    /// Owning database, when the listing reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl TableRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            luid: None,
            database: None,
        }
    }

    pub fn with_luid(mut self, luid: impl Into<String>) -> Self {
        self.luid = Some(luid.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Identifier accepted by the REST table/column endpoints
    pub fn rest_id(&self) -> Option<&str> {
        self.luid.as_deref().filter(|luid| !luid.is_empty())
    }
}

/// A column as the catalog sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,

    /// Catalog column identifier
    pub id: String,

    /// Description currently stored in the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A column comment read from the warehouse information schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub column_name: String,

    /// `None` when the column has no comment (SQL NULL)
    pub comment: Option<String>,
}

impl ColumnDescription {
    pub fn new(column_name: impl Into<String>, comment: Option<&str>) -> Self {
        Self {
            column_name: column_name.into(),
            comment: comment.map(str::to_string),
        }
    }
}

/// One catalog column matched with its warehouse comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub column_name: String,
    pub column_id: String,
    pub comment: Option<String>,
}

impl JoinedRecord {
    /// The comment to publish, if there is anything to publish
    ///
    /// Absent, empty and whitespace-only comments all count as nothing.
    pub fn publishable_comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_id_ignores_empty_luid() {
        let table = TableRecord::new("ORDERS", "md-1").with_luid("");
        assert_eq!(table.rest_id(), None);

        let table = TableRecord::new("ORDERS", "md-1").with_luid("luid-1");
        assert_eq!(table.rest_id(), Some("luid-1"));
    }

    #[test]
    fn publishable_comment_skips_blank() {
        let mut record = JoinedRecord {
            column_name: "ID".to_string(),
            column_id: "c1".to_string(),
            comment: None,
        };
        assert_eq!(record.publishable_comment(), None);

        record.comment = Some(String::new());
        assert_eq!(record.publishable_comment(), None);

        record.comment = Some("   \n".to_string());
        assert_eq!(record.publishable_comment(), None);

        record.comment = Some(" Customer identifier".to_string());
        assert_eq!(record.publishable_comment(), Some(" Customer identifier"));
    }
}
