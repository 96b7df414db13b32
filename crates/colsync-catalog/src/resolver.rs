//! Table name → catalog table id resolution
//!
//! The metadata API gives every table of a warehouse database in one query
//! and is tried first. The site's REST table listing is not scoped to a
//! database, so it is only scanned when the metadata query failed or the
//! metadata match carries no LUID. Both paths match names exactly and refuse
//! to guess between duplicates.

use crate::api::{CatalogApi, CatalogSession};
use colsync_core::{SyncError, TableRecord};

/// Find the single table named `name` (case-sensitive)
pub fn find_unique_table<'a>(tables: &'a [TableRecord], name: &str) -> Result<&'a TableRecord, SyncError> {
    let matches: Vec<&TableRecord> = tables.iter().filter(|t| t.name == name).collect();

    match matches.as_slice() {
        [] => Err(SyncError::NotFoundError(format!("No catalog table named '{}'", name))),
        [single] => Ok(*single),
        many => Err(SyncError::AmbiguousMatchError {
            name: name.to_string(),
            candidates: many
                .iter()
                .map(|t| match &t.database {
                    Some(db) => format!("{}.{} ({})", db, t.name, t.rest_id().unwrap_or(&t.id)),
                    None => t.rest_id().unwrap_or(&t.id).to_string(),
                })
                .collect(),
        }),
    }
}

/// Fallback lookup: scan the site's full table listing for `table_name`
pub async fn resolve_table_id(
    catalog: &dyn CatalogApi,
    session: &CatalogSession,
    table_name: &str,
) -> Result<String, SyncError> {
    let tables = catalog.list_site_tables(session).await?;
    tracing::debug!(table = table_name, site_tables = tables.len(), "resolving table via REST listing");

    let table = find_unique_table(&tables, table_name)?;
    table
        .rest_id()
        .map(str::to_string)
        .ok_or_else(|| SyncError::ProtocolError(format!("Catalog table '{}' has no id", table_name)))
}

/// Resolves table names for one run against one warehouse database
#[derive(Debug, Clone)]
pub struct TableResolver {
    database: String,

    /// Tables from the metadata API; `None` when that query failed
    metadata_tables: Option<Vec<TableRecord>>,
}

impl TableResolver {
    /// Query the metadata API once for `database`
    ///
    /// Authentication and connectivity failures are returned; any other
    /// metadata failure leaves the resolver on the REST fallback path.
    pub async fn load(
        catalog: &dyn CatalogApi,
        session: &CatalogSession,
        database: &str,
    ) -> Result<Self, SyncError> {
        let metadata_tables = match catalog.list_tables_by_database(session, database).await {
            Ok(tables) => Some(tables),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(database, error = %e, "metadata API lookup failed, falling back to REST table listing");
                None
            }
        };

        Ok(Self {
            database: database.to_string(),
            metadata_tables,
        })
    }

    /// Resolver with a known table list (skips the metadata query)
    pub fn from_tables(database: impl Into<String>, tables: Vec<TableRecord>) -> Self {
        Self {
            database: database.into(),
            metadata_tables: Some(tables),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Names of all tables the metadata API reported, deduplicated, in listing order
    pub fn table_names(&self) -> Option<Vec<String>> {
        self.metadata_tables.as_ref().map(|tables| {
            let mut names: Vec<String> = Vec::with_capacity(tables.len());
            for table in tables {
                if !names.contains(&table.name) {
                    names.push(table.name.clone());
                }
            }
            names
        })
    }

    /// Tables the metadata API reported
    pub fn tables(&self) -> Option<&[TableRecord]> {
        self.metadata_tables.as_deref()
    }

    /// Resolve a table name to the id accepted by the REST column endpoints
    ///
    /// A name missing from a successful metadata listing is not found; the
    /// site-wide listing could hold a same-named table of another database.
    pub async fn resolve(
        &self,
        catalog: &dyn CatalogApi,
        session: &CatalogSession,
        table_name: &str,
    ) -> Result<String, SyncError> {
        if let Some(tables) = &self.metadata_tables {
            match find_unique_table(tables, table_name) {
                Ok(table) => {
                    if let Some(luid) = table.rest_id() {
                        tracing::debug!(table = table_name, luid, "resolved via metadata API");
                        return Ok(luid.to_string());
                    }
                    tracing::debug!(table = table_name, "metadata API has no LUID for table");
                }
                Err(SyncError::NotFoundError(_)) => {
                    return Err(SyncError::NotFoundError(format!(
                        "No catalog table named '{}' in database '{}'",
                        table_name, self.database
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        resolve_table_id(catalog, session, table_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Vec<TableRecord> {
        vec![
            TableRecord::new("ORDERS", "t-1").with_luid("t-1"),
            TableRecord::new("CUSTOMERS", "t-2").with_luid("t-2"),
            TableRecord::new("orders", "t-3").with_luid("t-3"),
        ]
    }

    #[test]
    fn unique_name_resolves() {
        let tables = tables();
        assert_eq!(find_unique_table(&tables, "ORDERS").unwrap().id, "t-1");
    }

    #[test]
    fn match_is_case_sensitive() {
        let tables = tables();
        assert_eq!(find_unique_table(&tables, "orders").unwrap().id, "t-3");
        assert!(matches!(
            find_unique_table(&tables, "Orders"),
            Err(SyncError::NotFoundError(_))
        ));
    }

    #[test]
    fn substring_does_not_match() {
        let tables = vec![TableRecord::new("ORDERS_ARCHIVE", "t-9").with_luid("t-9")];
        assert!(matches!(
            find_unique_table(&tables, "ORDERS"),
            Err(SyncError::NotFoundError(_))
        ));
    }

    #[test]
    fn duplicates_are_ambiguous() {
        let tables = vec![
            TableRecord::new("ORDERS", "md-1").with_luid("a").with_database("SALES"),
            TableRecord::new("ORDERS", "md-2").with_luid("b").with_database("FINANCE"),
        ];

        match find_unique_table(&tables, "ORDERS") {
            Err(SyncError::AmbiguousMatchError { name, candidates }) => {
                assert_eq!(name, "ORDERS");
                assert_eq!(candidates, vec!["SALES.ORDERS (a)", "FINANCE.ORDERS (b)"]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn table_names_are_deduplicated() {
        let resolver = TableResolver::from_tables(
            "ANALYTICS",
            vec![
                TableRecord::new("ORDERS", "1"),
                TableRecord::new("CUSTOMERS", "2"),
                TableRecord::new("ORDERS", "3"),
            ],
        );
        assert_eq!(resolver.table_names().unwrap(), vec!["ORDERS", "CUSTOMERS"]);
        assert_eq!(resolver.database(), "ANALYTICS");
    }
}
