//! # oxide-driver
//!
//! Async runtime side of the oxide-sql adapter contract.
//!
//! An engine adapter supplies two things:
//!
//! - a [`Dialect`](oxide_sql_core::Dialect) (and usually an
//!   [`Introspect`](oxide_sql_core::Introspect) implementation) from
//!   `oxide-sql-core`, which renders engine-specific SQL;
//! - a [`ConnectionManager`] that opens sessions with the engine.
//!
//! This crate turns them into a [`Driver`]: a bounded, fair [`Pool`] of
//! connections plus the operations a query host needs (run a query, check
//! the connection, introspect the schema, shut down).
//!
//! ## Pool semantics
//!
//! - At most `max_size` connections exist at any moment.
//! - Callers beyond that wait in arrival order, up to the acquire timeout,
//!   then fail with [`DriverError::PoolExhausted`].
//! - A connection is released on every exit path of [`Pool::execute`];
//!   a failed query never leaks a slot.
//! - A connection whose query was interrupted (timeout, dropped future) is
//!   closed or dropped instead of being reused.
//! - After [`Pool::close`] every acquire, pending or new, fails with
//!   [`DriverError::PoolClosed`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` for connection reuse and
//! query execution, `info` for pool shutdown, `warn` for timeouts and
//! release warnings. Install a subscriber in the host to see them.

mod config;
mod connection;
mod driver;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pool;

pub use config::{PoolConfig, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_SIZE};
pub use connection::{Connection, ConnectionManager};
pub use driver::Driver;
pub use error::{DriverError, ErrorKind, Result};
pub use pool::{Pool, PoolStatus, PooledConnection};
