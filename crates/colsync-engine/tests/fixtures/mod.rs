//! Shared fixtures: a small SALES database seen from both sides

#![allow(dead_code)]

use colsync_catalog::{CatalogApi, CatalogCredentials, CatalogSession, MockCatalog, MockCatalogBuilder};
use colsync_core::{ColumnDescription, ColumnRecord, TableRecord};
use colsync_warehouse::{MockWarehouse, MockWarehouseBuilder};

pub const CUSTOMERS_ID: &str = "luid-customers";
pub const ORDERS_ID: &str = "luid-orders";

pub fn customers_columns() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord::new("CUSTOMER_ID", "col-cust-id"),
        ColumnRecord::new("EMAIL", "col-cust-email"),
        ColumnRecord::new("SEGMENT", "col-cust-segment"),
        ColumnRecord::new("NOTES", "col-cust-notes"),
        ColumnRecord::new("CATALOG_ONLY", "col-cust-catalog-only"),
    ]
}

pub fn customers_comments() -> Vec<ColumnDescription> {
    vec![
        ColumnDescription::new("CUSTOMER_ID", Some("Customer identifier")),
        ColumnDescription::new("EMAIL", Some(r#"Primary "contact" address & <login>"#)),
        ColumnDescription::new("SEGMENT", Some("")),
        ColumnDescription::new("NOTES", None),
        ColumnDescription::new("WAREHOUSE_ONLY", Some("Not in the catalog")),
    ]
}

pub fn orders_columns() -> Vec<ColumnRecord> {
    vec![
        ColumnRecord::new("ORDER_ID", "col-ord-id"),
        ColumnRecord::new("STATUS", "col-ord-status"),
        ColumnRecord::new("AMOUNT", "col-ord-amount"),
    ]
}

pub fn orders_comments() -> Vec<ColumnDescription> {
    vec![
        ColumnDescription::new("ORDER_ID", Some("Order identifier")),
        ColumnDescription::new("STATUS", Some("Fulfilment status")),
        ColumnDescription::new("AMOUNT", Some("Order total in USD")),
    ]
}

pub fn catalog_builder() -> MockCatalogBuilder {
    MockCatalogBuilder::new()
        .with_table(
            TableRecord::new("CUSTOMERS", CUSTOMERS_ID).with_luid(CUSTOMERS_ID),
            customers_columns(),
        )
        .with_table(TableRecord::new("ORDERS", ORDERS_ID).with_luid(ORDERS_ID), orders_columns())
        .with_database(
            "SALES",
            vec![
                TableRecord::new("CUSTOMERS", "md-customers").with_luid(CUSTOMERS_ID),
                TableRecord::new("ORDERS", "md-orders").with_luid(ORDERS_ID),
            ],
        )
}

pub fn warehouse() -> MockWarehouse {
    MockWarehouseBuilder::new()
        .with_table("CUSTOMERS", customers_comments())
        .with_table("ORDERS", orders_comments())
        .build()
}

pub async fn sign_in(catalog: &MockCatalog) -> CatalogSession {
    catalog
        .sign_in(&CatalogCredentials::new("colsync", "secret", "sales"))
        .await
        .unwrap()
}
