//! Catalog (Tableau) access
//!
//! Exchanges a personal access token for a short-lived session, resolves table
//! names to catalog identifiers, lists catalog columns and updates column
//! descriptions.
//!
//! Every call takes the [`CatalogSession`] explicitly; clients hold no session
//! state of their own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use colsync_catalog::{CatalogApi, CatalogCredentials, TableauClient, TableResolver};
//!
//! let client = TableauClient::new("https://demo.tableau.com")?;
//! let session = client.sign_in(&credentials).await?;
//! let resolver = TableResolver::load(&client, &session, "ANALYTICS").await?;
//! let table_id = resolver.resolve(&client, &session, "ORDERS").await?;
//! let columns = client.list_columns(&session, &table_id).await?;
//! ```

pub mod api;
pub mod documents;
pub mod mock;
pub mod resolver;
pub mod tableau;

pub use api::{CatalogApi, CatalogCredentials, CatalogSession, SessionToken};
pub use mock::{MockCatalog, MockCatalogBuilder, PublishedDescription};
pub use resolver::{find_unique_table, resolve_table_id, TableResolver};
pub use tableau::TableauClient;
