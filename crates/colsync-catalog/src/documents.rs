//! Request and response documents for the catalog REST and Metadata APIs
//!
//! Responses are requested as JSON (`Accept: application/json`) and decoded
//! into typed documents. Fields the server may omit are `Option`s and checked
//! explicitly, so a missing field becomes a `ProtocolError` naming it.

use crate::api::{CatalogCredentials, CatalogSession, SessionToken};
use colsync_core::{ColumnRecord, SyncError, TableRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

/// GraphQL document listing the tables of one warehouse database
pub const TABLES_BY_DATABASE_QUERY: &str = r#"
query tablesByDatabase($connectionType: String!, $name: String!) {
  databases(filter: {connectionType: $connectionType, name: $name}) {
    name
    id
    tables {
      name
      id
      luid
    }
  }
}
"#;

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInCredentials<'a> {
    personal_access_token_name: &'a str,
    personal_access_token_secret: &'a str,
    site: SignInSite<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInSite<'a> {
    content_url: &'a str,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    credentials: SignInCredentials<'a>,
}

/// Body of the sign-in POST
pub fn sign_in_body(credentials: &CatalogCredentials) -> serde_json::Value {
    let request = SignInRequest {
        credentials: SignInCredentials {
            personal_access_token_name: &credentials.token_name,
            personal_access_token_secret: credentials.token_secret.expose(),
            site: SignInSite {
                content_url: &credentials.site,
            },
        },
    };
    // a struct of strings always serializes
    serde_json::to_value(request).unwrap_or_default()
}

/// Body of the metadata query; filter values travel as GraphQL variables
pub fn tables_by_database_body(connection_type: &str, database: &str) -> serde_json::Value {
    json!({
        "query": TABLES_BY_DATABASE_QUERY,
        "variables": {
            "connectionType": connection_type,
            "name": database,
        },
    })
}

/// Body of the column-update PUT
pub fn column_update_body(description: &str) -> serde_json::Value {
    json!({ "column": { "description": description } })
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

fn decode<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T, SyncError> {
    serde_json::from_str(body)
        .map_err(|e| SyncError::ProtocolError(format!("Malformed {} response: {}", what, e)))
}

fn required(value: Option<String>, field: &str) -> Result<String, SyncError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SyncError::ProtocolError(format!("Response is missing '{}'", field)))
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    credentials: Option<SignInResponseCredentials>,
}

#[derive(Debug, Deserialize)]
struct SignInResponseCredentials {
    token: Option<String>,
    site: Option<IdDoc>,
}

#[derive(Debug, Deserialize)]
struct IdDoc {
    id: Option<String>,
}

/// Parse the sign-in response into a session
pub fn parse_sign_in(body: &str) -> Result<CatalogSession, SyncError> {
    let response: SignInResponse = decode(body, "sign-in")?;
    let credentials = response
        .credentials
        .ok_or_else(|| SyncError::ProtocolError("Response is missing 'credentials'".to_string()))?;

    let token = required(credentials.token, "credentials.token")?;
    let site_id = required(credentials.site.and_then(|s| s.id), "credentials.site.id")?;

    Ok(CatalogSession {
        token: SessionToken::new(token),
        site_id,
    })
}

/// Pagination block of REST listings
///
/// The server sends the counters as strings; numbers are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(deserialize_with = "de_count")]
    pub page_number: u64,
    #[serde(deserialize_with = "de_count")]
    pub page_size: u64,
    #[serde(deserialize_with = "de_count")]
    pub total_available: u64,
}

fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// One page of a REST listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Whether another page should be requested after `collected` items
    pub fn has_more(&self, collected: usize) -> bool {
        match self.pagination {
            Some(p) => !self.items.is_empty() && (collected as u64) < p.total_available,
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TablesResponse {
    pagination: Option<Pagination>,
    tables: Option<TableList>,
}

#[derive(Debug, Deserialize)]
struct TableList {
    #[serde(default)]
    table: Vec<RestTable>,
}

#[derive(Debug, Deserialize)]
struct RestTable {
    id: Option<String>,
    name: Option<String>,
}

/// Parse one page of the site table listing
pub fn parse_table_page(body: &str) -> Result<Page<TableRecord>, SyncError> {
    let response: TablesResponse = decode(body, "table listing")?;

    let items = response
        .tables
        .map(|t| t.table)
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            let id = required(t.id, "table.id")?;
            let name = required(t.name, "table.name")?;
            Ok(TableRecord::new(name, id.clone()).with_luid(id))
        })
        .collect::<Result<Vec<_>, SyncError>>()?;

    Ok(Page {
        items,
        pagination: response.pagination,
    })
}

#[derive(Debug, Deserialize)]
struct ColumnsResponse {
    pagination: Option<Pagination>,
    columns: Option<ColumnList>,
}

#[derive(Debug, Deserialize)]
struct ColumnList {
    #[serde(default)]
    column: Vec<RestColumn>,
}

#[derive(Debug, Deserialize)]
struct RestColumn {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

/// Parse one page of a table's column listing
pub fn parse_column_page(body: &str) -> Result<Page<ColumnRecord>, SyncError> {
    let response: ColumnsResponse = decode(body, "column listing")?;

    let items = response
        .columns
        .map(|c| c.column)
        .unwrap_or_default()
        .into_iter()
        .map(|c| {
            Ok(ColumnRecord {
                id: required(c.id, "column.id")?,
                name: required(c.name, "column.name")?,
                description: c.description,
            })
        })
        .collect::<Result<Vec<_>, SyncError>>()?;

    Ok(Page {
        items,
        pagination: response.pagination,
    })
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    data: Option<MetadataData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataData {
    databases: Option<Vec<MetadataDatabase>>,
}

#[derive(Debug, Deserialize)]
struct MetadataDatabase {
    name: Option<String>,
    tables: Option<Vec<MetadataTable>>,
}

#[derive(Debug, Deserialize)]
struct MetadataTable {
    name: Option<String>,
    id: Option<String>,
    luid: Option<String>,
}

/// Parse the metadata query response into the tables of every matching database
pub fn parse_metadata_tables(body: &str, database: &str) -> Result<Vec<TableRecord>, SyncError> {
    let response: MetadataResponse = decode(body, "metadata")?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<String> = errors
            .into_iter()
            .map(|e| e.message.unwrap_or_else(|| "unknown error".to_string()))
            .collect();
        return Err(SyncError::ProtocolError(format!(
            "Metadata query failed: {}",
            messages.join("; ")
        )));
    }

    let databases = response
        .data
        .and_then(|d| d.databases)
        .ok_or_else(|| SyncError::ProtocolError("Response is missing 'data.databases'".to_string()))?;

    if databases.is_empty() {
        return Err(SyncError::ProtocolError(format!(
            "Metadata query returned no database named '{}'",
            database
        )));
    }

    let mut tables = Vec::new();
    for db in databases {
        let db_name = db.name.unwrap_or_else(|| database.to_string());
        for t in db.tables.unwrap_or_default() {
            let mut record = TableRecord::new(required(t.name, "tables.name")?, required(t.id, "tables.id")?)
                .with_database(db_name.clone());
            record.luid = t.luid.filter(|l| !l.is_empty());
            tables.push(record);
        }
    }

    Ok(tables)
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    summary: Option<String>,
    detail: Option<String>,
    code: Option<String>,
}

/// Human-readable message from an error response body
///
/// Falls back to a truncated copy of the raw body when it is not a catalog
/// error document.
pub fn error_message(body: &str) -> String {
    if let Ok(ErrorResponse { error: Some(detail) }) = serde_json::from_str::<ErrorResponse>(body) {
        let parts: Vec<String> = [detail.code, detail.summary, detail.detail]
            .into_iter()
            .flatten()
            .collect();
        if !parts.is_empty() {
            return parts.join(": ");
        }
    }

    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
