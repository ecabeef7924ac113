//! A scripted in-memory engine for tests.
//!
//! [`MockManager`] opens [`MockConnection`]s that answer from a script:
//! SQL registered with [`MockManager::respond`] or [`MockManager::fail`]
//! returns the scripted rows or error; any other statement returns a single
//! row echoing it back (`sql`, `params`). Counters record opened and closed
//! sessions, and an optional gate holds queries in flight until the test
//! lets them through.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use oxide_sql_core::{Row, SqlValue};
use tokio::sync::Semaphore;

use crate::connection::{Connection, ConnectionManager};
use crate::error::{DriverError, Result};

#[derive(Debug, Clone)]
enum Response {
    Rows(Vec<Row>),
    Error { code: Option<String>, message: String },
}

#[derive(Debug, Default)]
struct MockState {
    script: Mutex<HashMap<String, Response>>,
    executed: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    fail_connect: AtomicBool,
    fail_close: AtomicBool,
    opened: AtomicUsize,
    closed: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Opens scripted [`MockConnection`]s. Clones share the same script and
/// counters.
#[derive(Debug, Clone, Default)]
pub struct MockManager {
    state: Arc<MockState>,
}

impl MockManager {
    /// Creates a manager with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the rows returned for `sql`.
    pub fn respond(&self, sql: impl Into<String>, rows: Vec<Row>) -> &Self {
        lock(&self.state.script).insert(sql.into(), Response::Rows(rows));
        self
    }

    /// Scripts an engine error for `sql`.
    pub fn fail(&self, sql: impl Into<String>, code: Option<&str>, message: &str) -> &Self {
        lock(&self.state.script).insert(
            sql.into(),
            Response::Error {
                code: code.map(str::to_string),
                message: message.to_string(),
            },
        );
        self
    }

    /// Makes new connections fail to open.
    pub fn fail_connect(&self, fail: bool) {
        self.state.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Makes closing a connection report an error.
    pub fn fail_close(&self, fail: bool) {
        self.state.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Holds every query until [`MockManager::open_gate`] lets it through.
    pub fn close_gate(&self) {
        *lock(&self.state.gate) = Some(Arc::new(Semaphore::new(0)));
    }

    /// Lets `n` held (or future) queries complete.
    pub fn open_gate(&self, n: usize) {
        let gate = lock(&self.state.gate).clone();
        if let Some(gate) = gate {
            gate.add_permits(n);
        }
    }

    /// Statements executed so far, in start order.
    #[must_use]
    pub fn executed(&self) -> Vec<String> {
        lock(&self.state.executed).clone()
    }

    /// Sessions opened so far.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }

    /// Sessions closed so far.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Queries running right now.
    #[must_use]
    pub fn active(&self) -> usize {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Highest number of queries that ran at the same time.
    #[must_use]
    pub fn max_active(&self) -> usize {
        self.state.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionManager for MockManager {
    type Connection = MockConnection;

    async fn connect(&self) -> Result<MockConnection> {
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(DriverError::Connect("mock engine refused the connection".into()));
        }
        let id = self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection {
            id,
            state: Arc::clone(&self.state),
        })
    }
}

/// Decrements the active counter however the query future ends.
struct ActiveGuard(Arc<MockState>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A session of the mock engine.
#[derive(Debug)]
pub struct MockConnection {
    id: usize,
    state: Arc<MockState>,
}

impl MockConnection {
    /// Sequence number of this session, starting at 0.
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>> {
        let active = self.state.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = ActiveGuard(Arc::clone(&self.state));
        self.state.max_active.fetch_max(active, Ordering::SeqCst);
        lock(&self.state.executed).push(sql.to_string());

        let gate = lock(&self.state.gate).clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let response = lock(&self.state.script).get(sql).cloned();
        match response {
            Some(Response::Rows(rows)) => Ok(rows),
            Some(Response::Error { code, message }) => Err(DriverError::query(code, message)),
            None => Ok(vec![Row::new()
                .with("sql", sql)
                .with("params", i64::try_from(params.len()).unwrap_or(i64::MAX))
                .with("connection", i64::try_from(self.id).unwrap_or(i64::MAX))]),
        }
    }

    async fn close(self) -> Result<()> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_close.load(Ordering::SeqCst) {
            return Err(DriverError::Connect("mock engine failed to detach".into()));
        }
        Ok(())
    }
}
