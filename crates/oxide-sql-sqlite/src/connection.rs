//! SQLite sessions through `sqlx`.

use std::borrow::Cow;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use oxide_driver::{Connection, ConnectionManager, Driver, DriverError, Result};
use oxide_sql_core::{Row, SqlValue};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as _, Connection as _, Row as _, TypeInfo as _, ValueRef as _};
use tracing::debug;

use crate::dialect::SqliteDialect;

/// A driver over SQLite databases.
pub type SqliteDriver = Driver<SqliteDialect, SqliteManager>;

/// Opens [`SqliteSession`]s with fixed connect options.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    options: SqliteConnectOptions,
}

impl SqliteManager {
    /// Creates a manager from `sqlx` connect options.
    #[must_use]
    pub const fn new(options: SqliteConnectOptions) -> Self {
        Self { options }
    }

    /// Opens (and creates if missing) the database file at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(
            SqliteConnectOptions::new()
                .filename(path.into())
                .create_if_missing(true),
        )
    }

    /// Parses a `sqlite:` connection URL.
    ///
    /// # Errors
    ///
    /// [`DriverError::Connect`] when the URL cannot be parsed.
    pub fn from_url(url: &str) -> Result<Self> {
        SqliteConnectOptions::from_str(url)
            .map(Self::new)
            .map_err(|e| DriverError::Connect(e.to_string()))
    }
}

#[async_trait]
impl ConnectionManager for SqliteManager {
    type Connection = SqliteSession;

    async fn connect(&self) -> Result<SqliteSession> {
        let conn = SqliteConnection::connect_with(&self.options)
            .await
            .map_err(|e| DriverError::Connect(e.to_string()))?;
        debug!("Opened SQLite session");
        Ok(SqliteSession { conn })
    }
}

/// One SQLite connection.
#[derive(Debug)]
pub struct SqliteSession {
    conn: SqliteConnection,
}

#[async_trait]
impl Connection for SqliteSession {
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Bool(b) => query.bind(*b),
                SqlValue::Int(n) => query.bind(*n),
                SqlValue::Float(f) => query.bind(*f),
                SqlValue::Text(s) => query.bind(s.clone()),
                SqlValue::Blob(b) => query.bind(b.clone()),
            };
        }
        let rows = query
            .fetch_all(&mut self.conn)
            .await
            .map_err(query_error)?;
        rows.iter().map(decode_row).collect()
    }

    async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| DriverError::Connect(e.to_string()))
    }
}

fn query_error(err: sqlx::Error) -> DriverError {
    match err {
        sqlx::Error::Database(db) => {
            DriverError::query(db.code().map(Cow::into_owned), db.message())
        }
        other => DriverError::query(None, other.to_string()),
    }
}

/// Converts a row by the storage class of each value.
fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index).map_err(query_error)?;
        let value = if raw.is_null() {
            SqlValue::Null
        } else {
            let type_name = raw.type_info().name().to_string();
            match type_name.as_str() {
                "INTEGER" | "BOOLEAN" => {
                    SqlValue::Int(row.try_get_unchecked(index).map_err(query_error)?)
                }
                "REAL" => SqlValue::Float(row.try_get_unchecked(index).map_err(query_error)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(index).map_err(query_error)?),
                _ => SqlValue::Text(row.try_get_unchecked(index).map_err(query_error)?),
            }
        };
        out.push(column.name(), value);
    }
    Ok(out)
}
