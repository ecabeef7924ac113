//! Schema introspection contract.
//!
//! Adapter crates implement [`Introspect`] to supply the catalog queries of
//! their engine. Every query must alias its output columns to the names
//! used here (`table_schema`, `table_name`, `column_name`, `data_type`,
//! `target_table`, `target_column`) so rows decode the same way whatever
//! engine produced them.

use crate::dialect::Dialect;
use crate::error::DecodeError;
use crate::value::Row;

/// One column of a user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
}

impl ColumnInfo {
    /// Decodes a row of the columns query.
    ///
    /// # Errors
    ///
    /// As for [`Row::get_trimmed`], for each aliased column.
    pub fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            table_schema: row.get_trimmed("table_schema")?,
            table_name: row.get_trimmed("table_name")?,
            column_name: row.get_trimmed("column_name")?,
            data_type: row.get_trimmed("data_type")?,
        })
    }
}

/// One column participating in a primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyInfo {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
}

impl PrimaryKeyInfo {
    /// Decodes a row of the primary-key query.
    ///
    /// # Errors
    ///
    /// As for [`Row::get_trimmed`], for each aliased column.
    pub fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            table_schema: row.get_trimmed("table_schema")?,
            table_name: row.get_trimmed("table_name")?,
            column_name: row.get_trimmed("column_name")?,
        })
    }
}

/// One referencing column of a foreign key and the column it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyInfo {
    pub table_schema: String,
    pub table_name: String,
    pub column_name: String,
    pub target_table: String,
    pub target_column: String,
}

impl ForeignKeyInfo {
    /// Decodes a row of the foreign-key query.
    ///
    /// # Errors
    ///
    /// As for [`Row::get_trimmed`], for each aliased column.
    pub fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            table_schema: row.get_trimmed("table_schema")?,
            table_name: row.get_trimmed("table_name")?,
            column_name: row.get_trimmed("column_name")?,
            target_table: row.get_trimmed("target_table")?,
            target_column: row.get_trimmed("target_column")?,
        })
    }
}

/// Everything the introspection queries returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub columns: Vec<ColumnInfo>,
    pub primary_keys: Vec<PrimaryKeyInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

impl SchemaSnapshot {
    /// Whether the catalog had no matching objects at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.primary_keys.is_empty() && self.foreign_keys.is_empty()
    }

    /// Distinct table names, in first-seen order.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for column in &self.columns {
            if !names.contains(&column.table_name.as_str()) {
                names.push(&column.table_name);
            }
        }
        names
    }

    /// Columns of one table, in catalog order.
    pub fn columns_of<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ColumnInfo> + 'a {
        self.columns.iter().filter(move |c| c.table_name == table)
    }

    /// Primary-key column names of one table.
    #[must_use]
    pub fn primary_key_of(&self, table: &str) -> Vec<&str> {
        self.primary_keys
            .iter()
            .filter(|pk| pk.table_name == table)
            .map(|pk| pk.column_name.as_str())
            .collect()
    }
}

/// Supplies the catalog queries of one engine.
///
/// The optional `condition` is an SQL fragment from the host, appended to
/// the WHERE clause with `AND` so the host can scope results to some
/// schemas or tables. It is trusted SQL, never user input.
pub trait Introspect: Dialect {
    /// Query listing every column of every user table.
    fn columns_query(&self) -> String;

    /// Query listing primary-key columns.
    fn primary_keys_query(&self, condition: Option<&str>) -> String;

    /// Query listing foreign-key columns with their targets.
    fn foreign_keys_query(&self, condition: Option<&str>) -> String;
}

/// Appends ` AND (<condition>)` to `sql` when the condition is non-blank.
#[must_use]
pub fn with_condition(sql: &str, condition: Option<&str>) -> String {
    condition
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| sql.to_string(), |c| format!("{sql} AND ({c})"))
}
