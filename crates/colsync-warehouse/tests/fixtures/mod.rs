//! Column comment fixtures shared by warehouse tests
//!
//! These mirror what INFORMATION_SCHEMA.COLUMNS returns for typical tables:
//! upper-case column names, some documented, some not.

use colsync_core::ColumnDescription;

/// Customers table with one undocumented and one blank-commented column
pub fn customers_comments() -> Vec<ColumnDescription> {
    vec![
        ColumnDescription::new("CUSTOMER_ID", Some("Customer identifier")),
        ColumnDescription::new("EMAIL", Some("Primary contact address")),
        ColumnDescription::new("SEGMENT", None),
        ColumnDescription::new("NOTES", Some("")),
    ]
}

/// Orders table whose comments contain characters that break naive payloads
pub fn orders_comments() -> Vec<ColumnDescription> {
    vec![
        ColumnDescription::new("ORDER_ID", Some("Order identifier")),
        ColumnDescription::new("STATUS", Some(r#"One of "open", "shipped" & <cancelled>"#)),
        ColumnDescription::new("TOTAL", Some("Gross total in the customer's currency")),
    ]
}
