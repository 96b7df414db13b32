//! Tableau REST and Metadata API client
//!
//! REST calls go to `{server}/api/{version}/...`, metadata queries to
//! `{server}/api/metadata/graphql`. Every authenticated call carries the
//! session token in the `X-Tableau-Auth` header.
//!
//! Reference: https://help.tableau.com/current/api/rest_api/en-us/REST/rest_api_ref_metadata.htm

use crate::api::{CatalogApi, CatalogCredentials, CatalogSession};
use crate::documents::{self, Page};
use colsync_core::{CatalogConfig, ColumnRecord, SyncError, TableRecord};
use colsync_core::config::{DEFAULT_API_VERSION, DEFAULT_CONNECTION_TYPE, DEFAULT_PAGE_SIZE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};

const AUTH_HEADER: &str = "X-Tableau-Auth";

/// Catalog client for a Tableau Server / Tableau Cloud site
#[derive(Debug, Clone)]
pub struct TableauClient {
    http: Client,
    server: Url,
    api_version: String,
    connection_type: String,
    page_size: u32,
}

impl TableauClient {
    /// Create a client for a server base URL
    pub fn new(server: &str) -> Result<Self, SyncError> {
        let server = Url::parse(server)
            .map_err(|e| SyncError::ConfigError(format!("Invalid catalog server URL '{}': {}", server, e)))?;

        if server.cannot_be_a_base() {
            return Err(SyncError::ConfigError(format!(
                "Catalog server URL '{}' cannot be used as a base URL",
                server
            )));
        }

        Ok(Self {
            http: Client::new(),
            server,
            api_version: DEFAULT_API_VERSION.to_string(),
            connection_type: DEFAULT_CONNECTION_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a client from the `[catalog]` config section
    pub fn from_config(config: &CatalogConfig) -> Result<Self, SyncError> {
        Ok(Self::new(&config.server)?
            .with_api_version(&config.api_version)
            .with_connection_type(&config.connection_type)
            .with_page_size(config.page_size))
    }

    /// Set the REST API version (e.g. "3.13")
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the connector type used to filter metadata databases
    pub fn with_connection_type(mut self, connection_type: impl Into<String>) -> Self {
        self.connection_type = connection_type.into();
        self
    }

    /// Set the page size for paginated listings
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Build `{server}/{prefix..}/{segments..}` with each segment percent-encoded
    fn url(&self, prefix: &[&str], segments: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.server.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SyncError::ConfigError(format!("Invalid catalog server URL '{}'", self.server)))?;
            path.pop_if_empty();
            path.extend(prefix);
            path.extend(segments);
        }
        Ok(url)
    }

    /// REST endpoint URL under `/api/{version}`
    pub fn rest_url(&self, segments: &[&str]) -> Result<Url, SyncError> {
        self.url(&["api", self.api_version.as_str()], segments)
    }

    /// Metadata API endpoint URL
    pub fn metadata_url(&self) -> Result<Url, SyncError> {
        self.url(&["api", "metadata", "graphql"], &[])
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<String, SyncError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SyncError::ConnectivityError(format!("{} request failed: {}", what, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::ConnectivityError(format!("{} response could not be read: {}", what, e)))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status, &body, what))
        }
    }

    /// Fetch every page of a listing endpoint
    async fn fetch_all<T>(
        &self,
        session: &CatalogSession,
        url: Url,
        what: &str,
        parse: fn(&str) -> Result<Page<T>, SyncError>,
    ) -> Result<Vec<T>, SyncError> {
        let mut items = Vec::new();
        let mut page_number: u32 = 1;

        loop {
            tracing::debug!(what, page_number, "fetching page");
            let request = self
                .http
                .get(url.clone())
                .header(AUTH_HEADER, session.token.as_str())
                .query(&[("pageSize", self.page_size), ("pageNumber", page_number)]);

            let page = parse(&self.send(request, what).await?)?;
            let more = page.has_more(items.len() + page.items.len());
            items.extend(page.items);
            if !more {
                break;
            }
            page_number += 1;
        }

        Ok(items)
    }
}

/// Map a non-success HTTP status onto the shared taxonomy
pub fn status_error(status: StatusCode, body: &str, what: &str) -> SyncError {
    let message = format!("{} returned HTTP {}: {}", what, status.as_u16(), documents::error_message(body));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SyncError::AuthenticationError(message),
        StatusCode::NOT_FOUND => SyncError::NotFoundError(message),
        _ => SyncError::ProtocolError(message),
    }
}

#[async_trait::async_trait]
impl CatalogApi for TableauClient {
    fn name(&self) -> &'static str {
        "Tableau"
    }

    async fn sign_in(&self, credentials: &CatalogCredentials) -> Result<CatalogSession, SyncError> {
        let url = self.rest_url(&["auth", "signin"])?;
        tracing::debug!(%url, site = %credentials.site, "signing in");

        let request = self.http.post(url).json(&documents::sign_in_body(credentials));
        let body = self.send(request, "Sign-in").await?;
        let session = documents::parse_sign_in(&body)?;

        tracing::info!(site_id = %session.site_id, "signed in to catalog");
        Ok(session)
    }

    async fn sign_out(&self, session: &CatalogSession) -> Result<(), SyncError> {
        let url = self.rest_url(&["auth", "signout"])?;
        let request = self.http.post(url).header(AUTH_HEADER, session.token.as_str());
        self.send(request, "Sign-out").await?;
        tracing::debug!("signed out of catalog");
        Ok(())
    }

    async fn list_tables_by_database(
        &self,
        session: &CatalogSession,
        database: &str,
    ) -> Result<Vec<TableRecord>, SyncError> {
        let url = self.metadata_url()?;
        tracing::debug!(database, connection_type = %self.connection_type, "querying metadata API");

        let request = self
            .http
            .post(url)
            .header(AUTH_HEADER, session.token.as_str())
            .json(&documents::tables_by_database_body(&self.connection_type, database));

        let body = self.send(request, "Metadata query").await?;
        let tables = documents::parse_metadata_tables(&body, database)?;

        tracing::debug!(database, tables = tables.len(), "metadata tables listed");
        Ok(tables)
    }

    async fn list_site_tables(&self, session: &CatalogSession) -> Result<Vec<TableRecord>, SyncError> {
        let url = self.rest_url(&["sites", session.site_id.as_str(), "tables"])?;
        self.fetch_all(session, url, "Table listing", documents::parse_table_page).await
    }

    async fn list_columns(
        &self,
        session: &CatalogSession,
        table_id: &str,
    ) -> Result<Vec<ColumnRecord>, SyncError> {
        let url = self.rest_url(&["sites", session.site_id.as_str(), "tables", table_id, "columns"])?;
        self.fetch_all(session, url, "Column listing", documents::parse_column_page).await
    }

    async fn update_column_description(
        &self,
        session: &CatalogSession,
        table_id: &str,
        column_id: &str,
        description: &str,
    ) -> Result<(), SyncError> {
        let url = self.rest_url(&["sites", session.site_id.as_str(), "tables", table_id, "columns", column_id])?;
        let request = self
            .http
            .put(url)
            .header(AUTH_HEADER, session.token.as_str())
            .json(&documents::column_update_body(description));

        self.send(request, "Column update").await?;
        Ok(())
    }
}
