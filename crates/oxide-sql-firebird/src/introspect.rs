//! Firebird system-catalog introspection.
//!
//! Metadata comes from the `RDB$` tables. Their name columns are fixed-width
//! `CHAR`, so every text output is wrapped in `TRIM`. Rows are aliased to the
//! column names [`oxide_sql_core::introspect`] decodes.

use oxide_sql_core::introspect::{with_condition, Introspect};

use crate::dialect::FirebirdDialect;

/// Catalog relations that may carry a zero system flag on some servers and
/// must never show up as user tables.
const SYSTEM_RELATIONS: &[&str] = &[
    "RDB$DATABASE",
    "RDB$FIELDS",
    "RDB$INDEX_SEGMENTS",
    "RDB$INDICES",
    "RDB$RELATION_CONSTRAINTS",
    "RDB$RELATION_FIELDS",
    "RDB$ROLES",
    "RDB$SECURITY_CLASSES",
    "RDB$TRIGGERS",
    "RDB$USER_PRIVILEGES",
    "RDB$VIEW_RELATIONS",
];

fn quoted_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Introspect for FirebirdDialect {
    fn columns_query(&self) -> String {
        format!(
            "SELECT \
             TRIM(r.RDB$OWNER_NAME) AS \"table_schema\", \
             TRIM(r.RDB$RELATION_NAME) AS \"table_name\", \
             TRIM(f.RDB$FIELD_NAME) AS \"column_name\", \
             TRIM(t.RDB$TYPE_NAME) AS \"data_type\" \
             FROM RDB$RELATION_FIELDS f \
             JOIN RDB$RELATIONS r ON f.RDB$RELATION_NAME = r.RDB$RELATION_NAME \
             JOIN RDB$FIELDS fld ON f.RDB$FIELD_SOURCE = fld.RDB$FIELD_NAME \
             JOIN RDB$TYPES t ON fld.RDB$FIELD_TYPE = t.RDB$TYPE \
             WHERE r.RDB$SYSTEM_FLAG = 0 \
             AND r.RDB$RELATION_NAME NOT IN ({}) \
             AND t.RDB$FIELD_NAME = 'RDB$FIELD_TYPE' \
             ORDER BY r.RDB$RELATION_NAME, f.RDB$FIELD_POSITION",
            quoted_list(SYSTEM_RELATIONS)
        )
    }

    fn primary_keys_query(&self, condition: Option<&str>) -> String {
        let sql = "SELECT \
                   TRIM(r.RDB$OWNER_NAME) AS \"table_schema\", \
                   TRIM(cst.RDB$RELATION_NAME) AS \"table_name\", \
                   TRIM(s.RDB$FIELD_NAME) AS \"column_name\" \
                   FROM RDB$RELATION_CONSTRAINTS cst \
                   JOIN RDB$RELATIONS r ON cst.RDB$RELATION_NAME = r.RDB$RELATION_NAME \
                   JOIN RDB$INDEX_SEGMENTS s ON cst.RDB$INDEX_NAME = s.RDB$INDEX_NAME \
                   WHERE cst.RDB$CONSTRAINT_TYPE = 'PRIMARY KEY' \
                   AND cst.RDB$RELATION_NAME NOT IN ('RDB$DATABASE')";
        with_condition(sql, condition)
    }

    fn foreign_keys_query(&self, condition: Option<&str>) -> String {
        // The target is resolved through the unique constraint the foreign
        // key references; segments are paired by position for compound keys.
        let sql = "SELECT \
                   TRIM(r.RDB$OWNER_NAME) AS \"table_schema\", \
                   TRIM(rc.RDB$RELATION_NAME) AS \"table_name\", \
                   TRIM(isc.RDB$FIELD_NAME) AS \"column_name\", \
                   TRIM(tgtc.RDB$RELATION_NAME) AS \"target_table\", \
                   TRIM(isf.RDB$FIELD_NAME) AS \"target_column\" \
                   FROM RDB$RELATION_CONSTRAINTS rc \
                   JOIN RDB$RELATIONS r ON rc.RDB$RELATION_NAME = r.RDB$RELATION_NAME \
                   JOIN RDB$INDEX_SEGMENTS isc ON rc.RDB$INDEX_NAME = isc.RDB$INDEX_NAME \
                   JOIN RDB$REF_CONSTRAINTS refc ON rc.RDB$CONSTRAINT_NAME = refc.RDB$CONSTRAINT_NAME \
                   JOIN RDB$RELATION_CONSTRAINTS tgtc ON tgtc.RDB$CONSTRAINT_NAME = refc.RDB$CONST_NAME_UQ \
                   JOIN RDB$INDEX_SEGMENTS isf ON tgtc.RDB$INDEX_NAME = isf.RDB$INDEX_NAME \
                   AND isf.RDB$FIELD_POSITION = isc.RDB$FIELD_POSITION \
                   WHERE rc.RDB$CONSTRAINT_TYPE = 'FOREIGN KEY' \
                   AND rc.RDB$RELATION_NAME NOT IN ('RDB$DATABASE')";
        with_condition(sql, condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_query_excludes_system_relations() {
        let sql = FirebirdDialect.columns_query();
        assert!(sql.contains("r.RDB$SYSTEM_FLAG = 0"));
        assert!(sql.contains("NOT IN ('RDB$DATABASE', 'RDB$FIELDS', "));
        assert!(sql.contains("'RDB$VIEW_RELATIONS')"));
        for alias in ["table_schema", "table_name", "column_name", "data_type"] {
            assert!(sql.contains(&format!("AS \"{alias}\"")), "missing {alias}");
        }
        assert!(!sql.contains("  "));
    }

    #[test]
    fn test_primary_keys_query() {
        let sql = FirebirdDialect.primary_keys_query(None);
        assert!(sql.contains("RDB$CONSTRAINT_TYPE = 'PRIMARY KEY'"));
        assert!(sql.ends_with("NOT IN ('RDB$DATABASE')"));

        let scoped = FirebirdDialect.primary_keys_query(Some("cst.RDB$RELATION_NAME = 'EMPLOYEE'"));
        assert_eq!(
            scoped,
            format!("{sql} AND (cst.RDB$RELATION_NAME = 'EMPLOYEE')")
        );
    }

    #[test]
    fn test_foreign_keys_query() {
        let sql = FirebirdDialect.foreign_keys_query(None);
        assert!(sql.contains("RDB$CONSTRAINT_TYPE = 'FOREIGN KEY'"));
        assert!(sql.contains("JOIN RDB$REF_CONSTRAINTS refc"));
        assert!(sql.contains("TRIM(tgtc.RDB$RELATION_NAME) AS \"target_table\""));
        assert!(sql.contains("TRIM(isf.RDB$FIELD_NAME) AS \"target_column\""));

        let scoped = FirebirdDialect.foreign_keys_query(Some("rc.RDB$RELATION_NAME = 'SALES'"));
        assert!(scoped.ends_with(" AND (rc.RDB$RELATION_NAME = 'SALES')"));
    }

    #[test]
    fn test_blank_condition_is_ignored() {
        assert_eq!(
            FirebirdDialect.foreign_keys_query(Some("   ")),
            FirebirdDialect.foreign_keys_query(None)
        );
        assert_eq!(
            FirebirdDialect.primary_keys_query(Some("")),
            FirebirdDialect.primary_keys_query(None)
        );
    }
}
