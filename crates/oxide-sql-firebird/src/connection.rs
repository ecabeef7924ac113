//! Firebird sessions through `rsfbclient`.
//!
//! The client is synchronous, so every call into it runs on tokio's
//! blocking pool. The session sits behind a mutex shared with the blocking
//! task: a query future dropped mid-flight leaves the task running to
//! completion, and the session detaches once both sides have let go.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use oxide_driver::{Connection, ConnectionManager, DriverError, Result};
use oxide_sql_core::{Row, SqlValue};
use rsfbclient::{FbError, Queryable, SimpleConnection, SqlType};
use tokio::task;
use tracing::debug;

use crate::config::FirebirdConfig;

/// Opens [`FirebirdSession`]s with the settings of a [`FirebirdConfig`].
#[derive(Debug, Clone)]
pub struct FirebirdManager {
    config: FirebirdConfig,
}

impl FirebirdManager {
    /// Creates a manager connecting with `config`.
    #[must_use]
    pub const fn new(config: FirebirdConfig) -> Self {
        Self { config }
    }

    /// The settings sessions are opened with.
    #[must_use]
    pub const fn config(&self) -> &FirebirdConfig {
        &self.config
    }
}

fn attach(config: &FirebirdConfig) -> std::result::Result<SimpleConnection, FbError> {
    let conn = rsfbclient::builder_pure_rust()
        .host(config.host.as_str())
        .port(config.port)
        .db_name(config.database.as_str())
        .user(config.user.as_str())
        .pass(config.password.as_str())
        .connect()?;
    Ok(conn.into())
}

#[async_trait]
impl ConnectionManager for FirebirdManager {
    type Connection = FirebirdSession;

    async fn connect(&self) -> Result<FirebirdSession> {
        let config = self.config.clone();
        let conn = task::spawn_blocking(move || attach(&config))
            .await
            .map_err(|e| DriverError::Connect(e.to_string()))?
            .map_err(|e| connect_error(&e))?;
        debug!(database = %self.config.connection_string(), "Opened Firebird session");
        Ok(FirebirdSession {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// One attachment to a Firebird database.
pub struct FirebirdSession {
    conn: Arc<Mutex<SimpleConnection>>,
}

impl std::fmt::Debug for FirebirdSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebirdSession").finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for FirebirdSession {
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let params: Vec<SqlType> = params.iter().map(to_sql_type).collect();
        let rows = task::spawn_blocking(
            move || -> std::result::Result<Vec<rsfbclient::Row>, FbError> {
                let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
                conn.query(&sql, params)
            },
        )
        .await
        .map_err(|e| DriverError::query(None, format!("Firebird client task failed: {e}")))?
        .map_err(query_error)?;
        Ok(rows.into_iter().map(decode_row).collect())
    }

    async fn close(self) -> Result<()> {
        // Still shared with an interrupted query: the session detaches when
        // that task drops its handle.
        let Ok(conn) = Arc::try_unwrap(self.conn) else {
            return Ok(());
        };
        let conn = conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        task::spawn_blocking(move || conn.close())
            .await
            .map_err(|e| DriverError::Connect(e.to_string()))?
            .map_err(|e| connect_error(&e))
    }
}

/// Maps a statement failure, keeping the SQLCODE when the server sent one.
fn query_error(err: FbError) -> DriverError {
    match err {
        FbError::Sql { msg, code } => DriverError::query(Some(code.to_string()), msg),
        other => DriverError::query(None, other.to_string()),
    }
}

fn connect_error(err: &FbError) -> DriverError {
    DriverError::Connect(err.to_string())
}

fn to_sql_type(value: &SqlValue) -> SqlType {
    match value {
        SqlValue::Null => SqlType::Null,
        SqlValue::Bool(b) => SqlType::Boolean(*b),
        SqlValue::Int(n) => SqlType::Integer(*n),
        SqlValue::Float(f) => SqlType::Floating(*f),
        SqlValue::Text(s) => SqlType::Text(s.clone()),
        SqlValue::Blob(b) => SqlType::Binary(b.clone()),
    }
}

fn from_sql_type(value: SqlType) -> SqlValue {
    match value {
        SqlType::Null => SqlValue::Null,
        SqlType::Boolean(b) => SqlValue::Bool(b),
        SqlType::Integer(n) => SqlValue::Int(n),
        SqlType::Floating(f) => SqlValue::Float(f),
        SqlType::Text(s) => SqlValue::Text(s),
        SqlType::Binary(b) => SqlValue::Blob(b),
        SqlType::Timestamp(ts) => SqlValue::Text(ts.to_string()),
    }
}

fn decode_row(row: rsfbclient::Row) -> Row {
    let mut out = Row::new();
    for column in row.cols {
        out.push(column.name, from_sql_type(column.value));
    }
    out
}
