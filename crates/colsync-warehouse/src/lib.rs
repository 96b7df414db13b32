//! Warehouse adapters for reading column comments
//!
//! Adapters query the warehouse's INFORMATION_SCHEMA.COLUMNS view and return
//! one [`ColumnDescription`](colsync_core::ColumnDescription) per column.
//!
//! ## Features
//!
//! - `snowflake` - Snowflake support via `snowflake-api`
//!
//! Without the feature the Snowflake adapter still builds but reports a
//! configuration error when used. [`MockWarehouse`] is always available.
//!
//! ## Example
//!
//! ```rust,ignore
//! use colsync_warehouse::{SnowflakeAdapter, WarehouseAdapter};
//!
//! let adapter = SnowflakeAdapter::new("xy12345.us-east-1", "user", "pass")
//!     .with_database("ANALYTICS")
//!     .open()
//!     .await?;
//! let comments = adapter.describe_columns("ORDERS").await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod snowflake;
pub mod sql;

pub use adapter::WarehouseAdapter;
pub use mock::{MockWarehouse, MockWarehouseBuilder};
pub use snowflake::{SnowflakeAdapter, SnowflakeAdapterBuilder};
pub use sql::{describe_columns_query, quote_literal};
