//! SQLite schema introspection.
//!
//! SQLite has a single schema per attached database, reported here as
//! `main`. Internal `sqlite_*` tables are skipped.

use oxide_sql_core::introspect::{with_condition, Introspect};

use crate::dialect::SqliteDialect;

const USER_TABLES: &str = "m.type = 'table' AND m.name NOT LIKE 'sqlite\\_%' ESCAPE '\\'";

impl Introspect for SqliteDialect {
    fn columns_query(&self) -> String {
        format!(
            "SELECT 'main' AS table_schema, m.name AS table_name, \
             p.name AS column_name, p.type AS data_type \
             FROM sqlite_master m JOIN pragma_table_info(m.name) p \
             WHERE {USER_TABLES} \
             ORDER BY m.name, p.cid"
        )
    }

    fn primary_keys_query(&self, condition: Option<&str>) -> String {
        let sql = format!(
            "SELECT 'main' AS table_schema, m.name AS table_name, p.name AS column_name \
             FROM sqlite_master m JOIN pragma_table_info(m.name) p \
             WHERE {USER_TABLES} AND p.pk > 0"
        );
        with_condition(&sql, condition)
    }

    fn foreign_keys_query(&self, condition: Option<&str>) -> String {
        // A reference without a column list targets the parent's primary key.
        let sql = format!(
            "SELECT 'main' AS table_schema, m.name AS table_name, \
             f.\"from\" AS column_name, f.\"table\" AS target_table, \
             COALESCE(f.\"to\", (SELECT t.name FROM pragma_table_info(f.\"table\") t \
             WHERE t.pk = f.seq + 1)) AS target_column \
             FROM sqlite_master m JOIN pragma_foreign_key_list(m.name) f \
             WHERE {USER_TABLES}"
        );
        with_condition(&sql, condition)
    }
}
