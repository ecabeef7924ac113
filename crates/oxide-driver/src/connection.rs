//! Connection traits.
//!
//! An engine adapter plugs into the driver by implementing
//! [`ConnectionManager`] (open a session) and [`Connection`] (run one query
//! at a time on it). Everything else, pooling, timeouts and release, is
//! handled by [`Pool`](crate::Pool).

use async_trait::async_trait;
use oxide_sql_core::{Row, SqlValue};

use crate::error::Result;

/// A live session with the database.
///
/// The pool guarantees exclusive access: `query` is only ever called with
/// `&mut self` from a single task, and never concurrently.
#[async_trait]
pub trait Connection: Send + Sized + 'static {
    /// Runs a statement with positional parameters and collects its rows.
    ///
    /// Engine failures must be mapped to
    /// [`DriverError::Query`](crate::DriverError::Query) with the engine's
    /// code and message.
    ///
    /// # Errors
    ///
    /// The engine's error for the statement.
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>>;

    /// Closes the session.
    ///
    /// # Errors
    ///
    /// When the engine fails to detach; the pool logs it and moves on.
    async fn close(self) -> Result<()>;
}

/// Opens sessions for a [`Pool`](crate::Pool).
#[async_trait]
pub trait ConnectionManager: Send + Sync + 'static {
    /// The session type this manager opens.
    type Connection: Connection;

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Failures should be reported as
    /// [`DriverError::Connect`](crate::DriverError::Connect).
    async fn connect(&self) -> Result<Self::Connection>;
}
