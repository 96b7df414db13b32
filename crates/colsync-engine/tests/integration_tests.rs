//! End-to-end runs against the in-memory warehouse and catalog

mod fixtures;

use colsync_catalog::{CatalogApi, MockCatalogBuilder, PublishedDescription, TableResolver};
use colsync_core::{ColumnDescription, ColumnRecord, ColumnStatus, SyncError, TableRecord};
use colsync_engine::{join, synchronize, SyncOptions, SyncPipeline, SyncTargets};
use fixtures::*;
use pretty_assertions::assert_eq;

fn targets(names: &[&str]) -> SyncTargets {
    SyncTargets::Tables(names.iter().map(|n| n.to_string()).collect())
}

#[tokio::test]
async fn test_sync_publishes_comments_verbatim() {
    let catalog = catalog_builder().build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let pipeline = SyncPipeline::new(&warehouse, &catalog, &session, &resolver);
    let report = pipeline.sync_table("CUSTOMERS").await;

    assert_eq!(report.table_id.as_deref(), Some(CUSTOMERS_ID));
    assert_eq!(report.error, None);

    let statuses: Vec<(&str, &ColumnStatus)> =
        report.columns.iter().map(|c| (c.column_name.as_str(), &c.status)).collect();
    assert_eq!(
        statuses,
        vec![
            ("CUSTOMER_ID", &ColumnStatus::Updated),
            ("EMAIL", &ColumnStatus::Updated),
            ("SEGMENT", &ColumnStatus::Skipped),
            ("NOTES", &ColumnStatus::Skipped),
        ]
    );

    assert_eq!(
        catalog.description_of(CUSTOMERS_ID, "col-cust-id").await.as_deref(),
        Some("Customer identifier")
    );
    assert_eq!(
        catalog.description_of(CUSTOMERS_ID, "col-cust-email").await.as_deref(),
        Some(r#"Primary "contact" address & <login>"#)
    );
}

#[tokio::test]
async fn test_blank_and_missing_comments_never_reach_catalog() {
    let catalog = catalog_builder().build();
    let session = sign_in(&catalog).await;

    let columns = customers_columns();
    let descriptions = vec![
        ColumnDescription::new("CUSTOMER_ID", Some("")),
        ColumnDescription::new("EMAIL", Some(" \t\n")),
        ColumnDescription::new("SEGMENT", None),
    ];
    let joined = join(&columns, &descriptions);
    assert_eq!(joined.len(), 3);

    let outcomes = synchronize(&catalog, &session, CUSTOMERS_ID, &joined, SyncOptions::default()).await;

    assert!(outcomes.iter().all(|o| o.status == ColumnStatus::Skipped));
    assert_eq!(catalog.update_attempts().await, 0);
    assert!(catalog.published().await.is_empty());
}

#[tokio::test]
async fn test_rejected_updates_are_collected() {
    let catalog = catalog_builder()
        .with_rejected_column("col-ord-status")
        .build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .sync_table("ORDERS")
        .await;

    assert_eq!(report.columns.len(), 3);
    assert_eq!(report.updated(), 2);
    assert_eq!(report.failures(), 1);
    assert_eq!(report.error, None);

    match &report.columns[1].status {
        ColumnStatus::Failed { error } => assert!(error.contains("HTTP 400"), "{}", error),
        other => panic!("expected failure, got {:?}", other),
    }

    // the column after the rejected one was still published
    assert_eq!(
        catalog.published().await.last(),
        Some(&PublishedDescription {
            table_id: ORDERS_ID.to_string(),
            column_id: "col-ord-amount".to_string(),
            description: "Order total in USD".to_string(),
        })
    );
}

#[tokio::test]
async fn test_dry_run_makes_no_updates() {
    let catalog = catalog_builder().build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .with_options(SyncOptions::dry_run())
        .run(&targets(&["CUSTOMERS", "ORDERS"]))
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.summary.planned, 5);
    assert_eq!(report.summary.skipped, 2);
    assert_eq!(report.summary.updated, 0);
    assert_eq!(catalog.update_attempts().await, 0);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_failed_table_does_not_stop_run() {
    let catalog = catalog_builder().build();
    let warehouse = warehouse();
    warehouse
        .add_error_for_table("ORDERS", SyncError::ProtocolError("warehouse query failed".to_string()))
        .await;
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .run(&targets(&["MISSING", "ORDERS", "CUSTOMERS"]))
        .await
        .unwrap();

    assert_eq!(report.summary.tables, 3);
    assert_eq!(report.summary.tables_failed, 2);
    assert_eq!(report.summary.updated, 2);
    assert!(report.has_failures());

    let missing = &report.tables[0];
    assert_eq!(missing.table_id, None);
    assert!(missing.error.as_deref().unwrap_or_default().contains("MISSING"));

    let orders = &report.tables[1];
    assert_eq!(orders.table_id.as_deref(), Some(ORDERS_ID));
    assert!(orders.columns.is_empty());

    assert_eq!(report.tables[2].error, None);
    assert_eq!(warehouse.queried_tables().await, vec!["ORDERS", "CUSTOMERS"]);
}

#[tokio::test]
async fn test_ambiguous_table_is_reported() {
    let catalog = MockCatalogBuilder::new()
        .with_table(TableRecord::new("ORDERS", "luid-a").with_luid("luid-a"), vec![])
        .with_table(TableRecord::new("ORDERS", "luid-b").with_luid("luid-b"), vec![])
        .with_metadata_error(SyncError::ProtocolError("metadata API disabled".to_string()))
        .build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .sync_table("ORDERS")
        .await;

    let error = report.error.unwrap();
    assert!(error.contains("luid-a") && error.contains("luid-b"), "{}", error);
    assert!(warehouse.queried_tables().await.is_empty());
}

#[tokio::test]
async fn test_all_tables_from_metadata() {
    let catalog = catalog_builder().build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .run(&SyncTargets::All)
        .await
        .unwrap();

    assert_eq!(report.summary.tables, 2);
    assert_eq!(warehouse.queried_tables().await, vec!["CUSTOMERS", "ORDERS"]);
    assert_eq!(report.summary.updated, 5);
}

#[tokio::test]
async fn test_all_tables_needs_metadata() {
    let catalog = catalog_builder()
        .with_metadata_error(SyncError::ProtocolError("metadata API disabled".to_string()))
        .build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let result = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .run(&SyncTargets::All)
        .await;

    assert!(matches!(result, Err(SyncError::ProtocolError(_))));

    // named tables still resolve through the REST listing
    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .run(&targets(&["ORDERS"]))
        .await
        .unwrap();
    assert_eq!(report.tables[0].table_id.as_deref(), Some(ORDERS_ID));
}

#[test]
fn test_join_never_exceeds_smaller_side() {
    let catalog_columns = vec![
        ColumnRecord::new("A", "1"),
        ColumnRecord::new("B", "2"),
        ColumnRecord::new("A", "3"),
    ];
    let descriptions = vec![
        ColumnDescription::new("A", Some("first")),
        ColumnDescription::new("A", Some("again")),
        ColumnDescription::new("B", Some("bee")),
        ColumnDescription::new("C", Some("sea")),
    ];

    let joined = join(&catalog_columns, &descriptions);
    assert!(joined.len() <= catalog_columns.len().min(descriptions.len()));
    assert_eq!(joined.len(), 2);
}

#[tokio::test]
async fn test_expired_session_fails_every_table() {
    let catalog = catalog_builder().build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();
    catalog.sign_out(&session).await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .run(&targets(&["CUSTOMERS", "ORDERS"]))
        .await
        .unwrap();

    assert_eq!(report.summary.tables_failed, 2);
    assert!(report.tables[0].error.as_deref().unwrap_or_default().contains("signed out"));
    assert!(warehouse.queried_tables().await.is_empty());
}

#[tokio::test]
async fn test_same_name_in_other_database_is_left_alone() {
    let catalog = MockCatalogBuilder::new()
        .with_table(
            TableRecord::new("CUSTOMERS", CUSTOMERS_ID).with_luid(CUSTOMERS_ID),
            customers_columns(),
        )
        .with_table(
            TableRecord::new("ORDERS", "luid-fin-orders").with_luid("luid-fin-orders"),
            orders_columns(),
        )
        .with_database(
            "SALES",
            vec![TableRecord::new("CUSTOMERS", "md-customers").with_luid(CUSTOMERS_ID)],
        )
        .build();
    let warehouse = warehouse();
    let session = sign_in(&catalog).await;
    let resolver = TableResolver::load(&catalog, &session, "SALES").await.unwrap();

    let report = SyncPipeline::new(&warehouse, &catalog, &session, &resolver)
        .sync_table("ORDERS")
        .await;

    assert_eq!(report.table_id, None);
    assert!(report.error.is_some());
    assert_eq!(catalog.update_attempts().await, 0);
    assert!(warehouse.queried_tables().await.is_empty());
}
