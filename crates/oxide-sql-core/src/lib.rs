//! # oxide-sql-core
//!
//! The engine-agnostic half of an oxide-sql database adapter.
//!
//! This crate provides:
//! - [`SqlValue`] and [`Row`], the parameter and result types every adapter speaks
//! - The [`Dialect`] trait: pagination, parameter markers, string casts and
//!   case-insensitive matching for one engine
//! - [`Filter`] and [`ParamAllocator`] for rendering predicates with any dialect
//! - [`Query`] descriptors and the [`SelectQuery`] compiler
//! - The [`Introspect`] trait and normalized catalog rows
//!
//! Engine crates (`oxide-sql-firebird`, `oxide-sql-sqlite`) implement the
//! traits; `oxide-driver` runs the resulting queries over a connection pool.
//!
//! ## Rendering with a dialect
//!
//! ```rust
//! use oxide_sql_core::{Filter, GenericDialect, SelectQuery};
//!
//! let query = SelectQuery::from("customers")
//!     .column("id")
//!     .filter(Filter::contains("name", "100%"))
//!     .limit(20)
//!     .build(&GenericDialect::new());
//!
//! assert_eq!(
//!     query.sql(),
//!     "SELECT id FROM customers WHERE LOWER(name) LIKE LOWER('%' || ? || '%') ESCAPE '\\' LIMIT 20"
//! );
//! // The value is bound, with its wildcard escaped, never inlined.
//! assert_eq!(query.params()[0].as_str(), Some("100\\%"));
//! ```

pub mod dialect;
mod error;
pub mod filter;
pub mod introspect;
pub mod query;
pub mod value;

pub use dialect::{Dialect, GenericDialect, LikeMode};
pub use error::DecodeError;
pub use filter::{Filter, LikeFilter, ParamAllocator};
pub use introspect::{ColumnInfo, ForeignKeyInfo, Introspect, PrimaryKeyInfo, SchemaSnapshot};
pub use query::{Query, QueryOptions, SelectQuery};
pub use value::{Row, SqlValue, ToSqlValue};
