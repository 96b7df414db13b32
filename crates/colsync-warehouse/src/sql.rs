//! SQL text for the information-schema query
//!
//! `snowflake-api` only executes plain SQL strings, so values are embedded as
//! string literals. Every value goes through [`quote_literal`].

/// Render `value` as a Snowflake single-quoted string literal
///
/// Snowflake treats backslash as an escape character inside string literals,
/// so both `\` and `'` are doubled.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Build the column-comment query for a table, optionally scoped to a schema
///
/// Without a schema the same table name can match in several schemas; rows
/// are then grouped by schema so the first occurrence of a column is stable.
pub fn describe_columns_query(table_name: &str, schema: Option<&str>) -> String {
    let mut query = format!(
        "SELECT COLUMN_NAME, COMMENT FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_NAME = {}",
        quote_literal(table_name)
    );

    match schema {
        Some(schema) => {
            query.push_str(" AND TABLE_SCHEMA = ");
            query.push_str(&quote_literal(schema));
            query.push_str(" ORDER BY ORDINAL_POSITION");
        }
        None => query.push_str(" ORDER BY TABLE_SCHEMA, ORDINAL_POSITION"),
    }
    query
}
