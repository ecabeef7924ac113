//! # oxide-sql-firebird
//!
//! Firebird-specific extensions for `oxide-sql-core` and `oxide-driver`.
//!
//! # How Firebird differs from other dialects
//!
//! - **[ROWS] pagination**: Firebird windows results with
//!   `ROWS <m> TO <n>` (1-based, inclusive) rather than
//!   `LIMIT`/`OFFSET`. [`FirebirdDialect`] always renders a bounded
//!   window: a missing limit becomes 10000 rows.
//! - **No `ILIKE`**: there is no case-insensitive `LIKE`. Matches are
//!   rendered as `UPPER(<col>) SIMILAR TO <pattern>` with an explicit
//!   `ESCAPE '\'` clause; user values are upper-cased and escaped for
//!   every `SIMILAR TO` metacharacter before they are bound.
//! - **Anonymous parameters**: the wire protocol only knows `?`, so
//!   parameters bind strictly in order.
//! - **Bounded strings**: the widest practical string type is
//!   `VARCHAR(32767)`; casts to text use it.
//! - **No `FROM`-less `SELECT`**: a liveness query needs the one-row
//!   system table `RDB$DATABASE`.
//! - **[System tables]**: schema metadata lives in the `RDB$` catalog,
//!   whose `CHAR` columns come back blank-padded. The introspection
//!   queries `TRIM` them.
//!
//! [ROWS]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref40/firebird-40-language-reference.html#fblangref40-dml-select-rows
//! [SIMILAR TO]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref40/firebird-40-language-reference.html#fblangref40-commons-predsiimilarto
//! [System tables]: https://firebirdsql.org/file/documentation/html/en/refdocs/fblangref40/firebird-40-language-reference.html#fblangref40-appx04-systables
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_core::{Filter, SelectQuery, SqlValue};
//! use oxide_sql_firebird::FirebirdDialect;
//!
//! let query = SelectQuery::from("EMPLOYEE")
//!     .column("EMP_NO")
//!     .filter(Filter::starts_with("LAST_NAME", "Jo"))
//!     .limit(10)
//!     .offset(20)
//!     .build(&FirebirdDialect::new());
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT EMP_NO FROM EMPLOYEE WHERE UPPER(LAST_NAME) SIMILAR TO ? || '%' ESCAPE '\\' ROWS 20 TO 30"
//! );
//! assert_eq!(query.params(), [SqlValue::Text("JO".into())]);
//! ```
//!
//! ## Connecting
//!
//! [`FirebirdManager`] opens sessions with the pure-Rust `rsfbclient` wire
//! client, so no native `fbclient` library is needed:
//!
//! ```rust,ignore
//! use oxide_sql_firebird::FirebirdConfig;
//!
//! let driver = FirebirdConfig::new("/data/employee.fdb")
//!     .with_server("db.internal", 3050)
//!     .with_credentials("SYSDBA", "masterkey")
//!     .into_driver();
//! driver.test_connection().await?;
//! ```

mod config;
mod connection;
mod dialect;
mod introspect;

pub use config::{FirebirdConfig, FirebirdDriver, DEFAULT_PORT};
pub use connection::{FirebirdManager, FirebirdSession};
pub use dialect::{FirebirdDialect, DEFAULT_WINDOW, PATTERN_METACHARS};
