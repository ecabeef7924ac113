//! Bounded connection pool.
//!
//! Slots are permits of a fair (FIFO) [`tokio::sync::Semaphore`]: a caller
//! holding a permit owns exactly one connection, either reused from the idle
//! queue or freshly opened by the [`ConnectionManager`]. The permit travels
//! inside the [`PooledConnection`] guard and is released with it, so a slot
//! frees up on every exit path, including errors, timeouts and dropped
//! futures.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_driver::{Pool, PoolConfig};
//! use oxide_sql_core::Query;
//!
//! let pool = Pool::new(manager, PoolConfig::new().with_max_size(4));
//!
//! // Scoped use: acquire, run, release.
//! let rows = pool.execute(&Query::new("SELECT 1")).await?;
//!
//! // Manual use: the guard goes back to the pool on release.
//! let mut conn = pool.acquire().await?;
//! conn.execute(&Query::new("SELECT 2")).await?;
//! conn.release().await;
//!
//! pool.close().await;
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use oxide_sql_core::{Query, Row, SqlValue};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use crate::config::PoolConfig;
use crate::connection::{Connection, ConnectionManager};
use crate::error::{DriverError, Result};

/// A point-in-time view of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Configured maximum number of connections.
    pub max_size: usize,
    /// Live connections, idle or checked out.
    pub size: usize,
    /// Connections waiting in the idle queue.
    pub idle: usize,
    /// Slots a caller could acquire right now without waiting.
    pub available: usize,
}

struct PoolInner<M: ConnectionManager> {
    manager: M,
    config: PoolConfig,
    max_size: usize,
    semaphore: Arc<Semaphore>,
    idle: Mutex<VecDeque<M::Connection>>,
    size: AtomicUsize,
    closed: AtomicBool,
}

impl<M: ConnectionManager> PoolInner<M> {
    fn idle_queue(&self) -> MutexGuard<'_, VecDeque<M::Connection>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Puts a connection back on the idle queue, unless the pool has been
    /// closed, in which case the connection is handed back to be closed.
    ///
    /// The closed flag is checked under the queue lock, so a connection can
    /// never slip into the queue after `close` has drained it.
    fn push_idle(&self, conn: M::Connection) -> std::result::Result<(), M::Connection> {
        let mut idle = self.idle_queue();
        if self.is_closed() {
            return Err(conn);
        }
        idle.push_back(conn);
        drop(idle);
        Ok(())
    }

    fn pop_idle(&self) -> Option<M::Connection> {
        self.idle_queue().pop_back()
    }
}

/// Closes a connection, logging failures as release warnings.
async fn close_connection<C: Connection>(conn: C) {
    if let Err(e) = conn.close().await {
        let warning = DriverError::ReleaseWarning(e.to_string());
        warn!(error = %warning, "Failed to close connection");
    }
}

/// The pool slot of a checked-out connection.
///
/// Dropping it frees the permit. Unless the connection went back to the
/// idle queue, the connection is also taken off the live count.
struct Slot<M: ConnectionManager> {
    pool: Arc<PoolInner<M>>,
    _permit: OwnedSemaphorePermit,
    returned: bool,
}

impl<M: ConnectionManager> Drop for Slot<M> {
    fn drop(&mut self) {
        if !self.returned {
            self.pool.size.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// A bounded pool of connections opened by a [`ConnectionManager`].
///
/// Cloning a pool is cheap and yields another handle to the same pool.
pub struct Pool<M: ConnectionManager> {
    inner: Arc<PoolInner<M>>,
}

impl<M: ConnectionManager> Clone for Pool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ConnectionManager> fmt::Debug for Pool<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("status", &self.status())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<M: ConnectionManager> Pool<M> {
    /// Creates a pool. No connection is opened until the first acquire.
    #[must_use]
    pub fn new(manager: M, config: PoolConfig) -> Self {
        let max_size = config.effective_max_size();
        Self {
            inner: Arc::new(PoolInner {
                manager,
                config,
                max_size,
                semaphore: Arc::new(Semaphore::new(max_size)),
                idle: Mutex::new(VecDeque::with_capacity(max_size)),
                size: AtomicUsize::new(0),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// The pool's configuration.
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// The manager connections are opened with.
    #[must_use]
    pub fn manager(&self) -> &M {
        &self.inner.manager
    }

    /// Whether [`Pool::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Current pool counters.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            max_size: self.inner.max_size,
            size: self.inner.size.load(Ordering::SeqCst),
            idle: self.inner.idle_queue().len(),
            available: self.inner.semaphore.available_permits(),
        }
    }

    /// Waits for a free slot and returns a connection bound to it.
    ///
    /// Waiters are served in arrival order. Fails with
    /// [`DriverError::PoolExhausted`] when no slot frees up within the
    /// acquire timeout, and with [`DriverError::PoolClosed`] once the pool is
    /// closed, including for callers already waiting when it closes.
    ///
    /// # Errors
    ///
    /// [`DriverError::PoolExhausted`], [`DriverError::PoolClosed`], or the
    /// manager's error when a new connection cannot be opened.
    pub async fn acquire(&self) -> Result<PooledConnection<M>> {
        if self.is_closed() {
            return Err(DriverError::PoolClosed);
        }

        let timeout = self.inner.config.acquire_timeout;
        let acquire = Arc::clone(&self.inner.semaphore).acquire_owned();
        let permit = match tokio::time::timeout(timeout, acquire).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(DriverError::PoolClosed),
            Err(_) => {
                warn!(timeout = ?timeout, "Timed out waiting for a pooled connection");
                return Err(DriverError::PoolExhausted { timeout });
            }
        };
        if self.is_closed() {
            return Err(DriverError::PoolClosed);
        }

        let conn = match self.inner.pop_idle() {
            Some(conn) => {
                debug!("Reusing idle connection");
                conn
            }
            None => {
                let conn = self.inner.manager.connect().await?;
                let size = self.inner.size.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(size, "Opened new connection");
                conn
            }
        };

        Ok(PooledConnection {
            conn,
            slot: Slot {
                pool: Arc::clone(&self.inner),
                _permit: permit,
                returned: false,
            },
            in_flight: false,
        })
    }

    /// Runs one query on a pooled connection and releases the connection
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Any error of [`Pool::acquire`] or [`PooledConnection::execute`].
    pub async fn execute(&self, query: &Query) -> Result<Vec<Row>> {
        let mut conn = self.acquire().await?;
        let result = conn.execute(query).await;
        conn.release().await;
        result
    }

    /// Shuts the pool down.
    ///
    /// Every caller waiting in [`Pool::acquire`] wakes up with
    /// [`DriverError::PoolClosed`], idle connections are closed, and
    /// connections still checked out are closed when they come back.
    /// Calling `close` again does nothing.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.semaphore.close();

        let drained = std::mem::take(&mut *self.inner.idle_queue());
        info!(idle = drained.len(), "Closing connection pool");
        for conn in drained {
            self.inner.size.fetch_sub(1, Ordering::SeqCst);
            close_connection(conn).await;
        }
    }
}

/// A connection checked out of a [`Pool`].
///
/// The guard owns the pool slot. [`PooledConnection::release`] hands the
/// connection back and [`PooledConnection::discard`] closes it. Dropping the
/// guard drops the connection and frees the slot; this is also what happens
/// to a query future dropped mid-flight, whose connection is in an unknown
/// protocol state.
pub struct PooledConnection<M: ConnectionManager> {
    conn: M::Connection,
    slot: Slot<M>,
    in_flight: bool,
}

impl<M: ConnectionManager> fmt::Debug for PooledConnection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<M: ConnectionManager> PooledConnection<M> {
    /// Runs a statement on this connection.
    ///
    /// # Errors
    ///
    /// The engine's error for the statement.
    pub async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        debug!(sql = %sql, params = params.len(), "Executing query");
        self.in_flight = true;
        let result = self.conn.query(sql, params).await;
        self.in_flight = false;
        result
    }

    /// Runs a query descriptor, honoring its timeout.
    ///
    /// On timeout the connection is marked as interrupted and will be closed
    /// rather than reused when released.
    ///
    /// # Errors
    ///
    /// [`DriverError::Timeout`] when the query outlives its timeout, or the
    /// engine's error for the statement.
    pub async fn execute(&mut self, query: &Query) -> Result<Vec<Row>> {
        match query.query_options().timeout() {
            None => self.query(query.sql(), query.params()).await,
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.query(query.sql(), query.params())).await
                {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(timeout = ?timeout, sql = %query.sql(), "Query timed out");
                        Err(DriverError::Timeout(timeout))
                    }
                }
            }
        }
    }

    /// Returns the connection to the pool and frees the slot.
    ///
    /// Never fails: problems closing a connection are logged as release
    /// warnings so they cannot mask the outcome of the query that used it.
    pub async fn release(self) {
        let Self {
            conn,
            mut slot,
            in_flight,
        } = self;
        if in_flight {
            warn!("Discarding connection interrupted mid-query");
            close_connection(conn).await;
            return;
        }
        match slot.pool.push_idle(conn) {
            Ok(()) => {
                slot.returned = true;
                debug!("Connection returned to pool");
            }
            Err(conn) => close_connection(conn).await,
        }
    }

    /// Closes the connection instead of returning it, freeing the slot.
    ///
    /// For sessions the caller knows to be unusable, e.g. after the server
    /// dropped the link.
    pub async fn discard(self) {
        let Self { conn, slot, .. } = self;
        debug!("Discarding connection");
        close_connection(conn).await;
        drop(slot);
    }
}
