//! # oxide-sql-sqlite
//!
//! SQLite-specific extensions for `oxide-sql-core`, plus a `sqlx`-backed
//! [`ConnectionManager`](oxide_driver::ConnectionManager) so SQLite
//! databases can be queried through an [`oxide_driver::Driver`].
//!
//! # How SQLite differs from other dialects
//!
//! - **[LIMIT]**: SQLite paginates with `LIMIT`/`OFFSET`, but `OFFSET`
//!   is only valid after a `LIMIT`; an offset alone is rendered as
//!   `LIMIT -1 OFFSET n`.
//! - **[LIKE] is case-insensitive**: for ASCII characters `LIKE` already
//!   ignores case, so no `LOWER()` wrapping is needed.
//! - **Identifier quoting**: SQLite uses double quotes (`"`) as
//!   the standard quoting style, though it also accepts backticks
//!   and square brackets. See [SQLite keywords].
//! - **[Type affinity]**: SQLite uses a type-affinity system rather
//!   than strict column types. Values are decoded by their runtime
//!   storage class (`INTEGER`, `REAL`, `TEXT`, `BLOB`, `NULL`).
//! - **No information schema**: metadata comes from `sqlite_master`
//!   and the [`pragma_table_info`] / `pragma_foreign_key_list`
//!   table-valued functions.
//!
//! [LIMIT]: https://www.sqlite.org/lang_select.html#limitoffset
//! [LIKE]: https://www.sqlite.org/lang_expr.html#like
//! [SQLite keywords]: https://www.sqlite.org/lang_keywords.html
//! [Type affinity]: https://www.sqlite.org/datatype3.html
//! [`pragma_table_info`]: https://www.sqlite.org/pragma.html#pragfunc
//!
//! ## Example
//!
//! ```rust,no_run
//! use oxide_driver::PoolConfig;
//! use oxide_sql_core::{Filter, SelectQuery};
//! use oxide_sql_sqlite::{SqliteDriver, SqliteManager};
//!
//! # async fn run() -> oxide_driver::Result<()> {
//! let driver = SqliteDriver::new(
//!     oxide_sql_sqlite::SqliteDialect::new(),
//!     SqliteManager::file("app.db"),
//!     PoolConfig::new().with_max_size(4),
//! );
//!
//! let query = SelectQuery::from("users")
//!     .filter(Filter::contains("email", "@example.com"))
//!     .limit(10)
//!     .build(driver.dialect());
//! let _rows = driver.query(&query).await?;
//!
//! let _schema = driver.introspect(None).await?;
//! driver.release().await;
//! # Ok(())
//! # }
//! ```

mod connection;
mod dialect;
mod introspect;

pub use connection::{SqliteDriver, SqliteManager, SqliteSession};
pub use dialect::SqliteDialect;
