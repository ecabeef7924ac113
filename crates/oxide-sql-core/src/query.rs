//! Query descriptors and a dialect-driven SELECT compiler.
//!
//! A [`Query`] is what gets submitted to a connection: SQL text, its
//! positional parameters, and execution options. [`SelectQuery`] compiles a
//! simple abstract SELECT into a [`Query`] for any [`Dialect`], calling the
//! dialect for every engine-specific fragment.

use std::time::Duration;

use crate::dialect::Dialect;
use crate::filter::{Filter, ParamAllocator};
use crate::value::{SqlValue, ToSqlValue};

/// Execution options attached to a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    timeout: Option<Duration>,
}

impl QueryOptions {
    /// Options with no timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Fails the query if the engine has not answered within `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Per-query timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// An immutable query descriptor: SQL text, positional parameters and
/// options.
///
/// The builder methods consume the descriptor; once handed to a driver it
/// is only ever read.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    params: Vec<SqlValue>,
    options: QueryOptions,
}

impl Query {
    /// Creates a query without parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    /// Creates a query with parameters.
    #[must_use]
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
            options: QueryOptions::default(),
        }
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn bind<V: ToSqlValue>(mut self, value: V) -> Self {
        self.params.push(value.to_sql_value());
        self
    }

    /// Replaces the execution options.
    #[must_use]
    pub const fn options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// SQL text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Positional parameters, in marker order.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Execution options.
    #[must_use]
    pub const fn query_options(&self) -> QueryOptions {
        self.options
    }
}

impl From<&str> for Query {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for Query {
    fn from(sql: String) -> Self {
        Self::new(sql)
    }
}

/// Order direction for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

/// An ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to order by
    pub column: String,
    /// Order direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Parses an order specification; a `-` prefix means descending.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let (column, direction) = spec
            .strip_prefix('-')
            .map_or((spec, OrderDirection::Asc), |column| {
                (column, OrderDirection::Desc)
            });
        Self {
            column: column.to_string(),
            direction,
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self.direction {
            OrderDirection::Asc => format!("{} ASC", self.column),
            OrderDirection::Desc => format!("{} DESC", self.column),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Projection {
    Column(String),
    AsString(String),
}

/// A chainable abstract SELECT, compiled per dialect.
///
/// # Example
///
/// ```rust
/// use oxide_sql_core::GenericDialect;
/// use oxide_sql_core::filter::Filter;
/// use oxide_sql_core::query::SelectQuery;
///
/// let query = SelectQuery::from("users")
///     .column("id")
///     .column("name")
///     .filter(Filter::eq("active", true))
///     .order_by("-id")
///     .limit(10)
///     .build(&GenericDialect::new());
///
/// assert_eq!(
///     query.sql(),
///     "SELECT id, name FROM users WHERE active = ? ORDER BY id DESC LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    projections: Vec<Projection>,
    filters: Vec<Filter>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    distinct: bool,
}

impl SelectQuery {
    /// Starts a SELECT from a table (or any FROM-clause expression).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            projections: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            distinct: false,
        }
    }

    /// Adds a column to the projection. Without columns, `*` is selected.
    #[must_use]
    pub fn column(mut self, column: &str) -> Self {
        self.projections.push(Projection::Column(column.to_string()));
        self
    }

    /// Adds a column cast to the dialect's string type.
    #[must_use]
    pub fn column_as_string(mut self, column: &str) -> Self {
        self.projections
            .push(Projection::AsString(column.to_string()));
        self
    }

    /// Adds a filter; multiple filters are combined with AND.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Adds an ordering; a `-` prefix means descending.
    #[must_use]
    pub fn order_by(mut self, spec: &str) -> Self {
        self.order_by.push(OrderBy::parse(spec));
        self
    }

    /// Limits the number of rows.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skips rows.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Selects distinct rows.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Compiles the SELECT for `dialect`.
    #[must_use]
    pub fn build(&self, dialect: &dyn Dialect) -> Query {
        let mut params = ParamAllocator::new(dialect);
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        if self.projections.is_empty() {
            sql.push('*');
        } else {
            let columns: Vec<String> = self
                .projections
                .iter()
                .map(|p| match p {
                    Projection::Column(c) => c.clone(),
                    Projection::AsString(c) => {
                        format!("{} AS {c}", dialect.cast_to_string(c))
                    }
                })
                .collect();
            sql.push_str(&columns.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        if !self.filters.is_empty() {
            let conditions: Vec<String> = self
                .filters
                .iter()
                .map(|f| f.render_with(&mut params))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let order_parts: Vec<String> = self.order_by.iter().map(OrderBy::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_parts.join(", "));
        }

        let pagination = dialect.pagination(self.limit, self.offset);
        if !pagination.is_empty() {
            sql.push(' ');
            sql.push_str(&pagination);
        }

        Query::with_params(sql, params.into_params())
    }
}
