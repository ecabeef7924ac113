//! Predicate rendering.
//!
//! Filters are rendered against a [`Dialect`], which decides the parameter
//! markers and how case-insensitive matching is spelled on the target
//! engine. Values never end up in the SQL text: each one is handed to a
//! [`ParamAllocator`] and replaced by the marker it returns.

use std::fmt;

use crate::dialect::{Dialect, LikeMode};
use crate::value::{SqlValue, ToSqlValue};

/// Collects positional parameters while a statement is being rendered.
///
/// The allocator asks the dialect for the marker of each new parameter, so
/// parameter order in [`ParamAllocator::into_params`] always matches marker
/// order in the rendered SQL.
pub struct ParamAllocator<'d> {
    dialect: &'d dyn Dialect,
    params: Vec<SqlValue>,
}

impl fmt::Debug for ParamAllocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamAllocator")
            .field("dialect", &self.dialect.name())
            .field("params", &self.params)
            .finish()
    }
}

impl<'d> ParamAllocator<'d> {
    /// Creates an allocator for the given dialect.
    #[must_use]
    pub const fn new(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            params: Vec::new(),
        }
    }

    /// The dialect markers are requested from.
    #[must_use]
    pub const fn dialect(&self) -> &'d dyn Dialect {
        self.dialect
    }

    /// Registers a parameter and returns its marker.
    pub fn allocate(&mut self, value: SqlValue) -> String {
        let index = self.params.len();
        self.params.push(value);
        self.dialect.parameter_placeholder(index)
    }

    /// Parameters allocated so far.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Consumes the allocator, returning the parameters in marker order.
    #[must_use]
    pub fn into_params(self) -> Vec<SqlValue> {
        self.params
    }
}

/// A case-insensitive pattern match on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeFilter {
    /// Column expression the pattern applies to.
    pub column: String,
    /// Renders `NOT` before the operator when set.
    pub negate: bool,
    /// The literal text to search for; metacharacters are escaped.
    pub value: String,
    /// Where the wildcards go.
    pub mode: LikeMode,
}

impl LikeFilter {
    /// Creates a non-negated match.
    #[must_use]
    pub fn new(column: impl Into<String>, value: impl Into<String>, mode: LikeMode) -> Self {
        Self {
            column: column.into(),
            negate: false,
            value: value.into(),
            mode,
        }
    }

    /// Negates the match.
    #[must_use]
    pub const fn negated(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Renders the predicate, allocating exactly one parameter.
    pub fn render_with(&self, params: &mut ParamAllocator<'_>) -> String {
        let dialect = params.dialect();
        let escaped = dialect.escape_pattern(&self.value);
        let placeholder = params.allocate(SqlValue::Text(escaped));
        dialect.like_ignore_case(&self.column, self.negate, &placeholder, self.mode)
    }

    /// Renders the predicate on its own, returning SQL and parameters.
    #[must_use]
    pub fn render(&self, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
        let mut params = ParamAllocator::new(dialect);
        let sql = self.render_with(&mut params);
        (sql, params.into_params())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::Ne => write!(f, "<>"),
            Self::Gt => write!(f, ">"),
            Self::Gte => write!(f, ">="),
            Self::Lt => write!(f, "<"),
            Self::Lte => write!(f, "<="),
        }
    }
}

/// A filter expression that can be combined with other expressions.
///
/// # Example
///
/// ```rust
/// use oxide_sql_core::GenericDialect;
/// use oxide_sql_core::filter::Filter;
///
/// let filter = Filter::eq("status", "active").and(Filter::contains("name", "smith"));
/// let (sql, params) = filter.render(&GenericDialect::new());
/// assert_eq!(
///     sql,
///     "(status = ?) AND (LOWER(name) LIKE LOWER('%' || ? || '%') ESCAPE '\\')"
/// );
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Simple comparison: column op value
    Compare {
        column: String,
        op: CompareOp,
        value: SqlValue,
    },
    /// IS NULL check
    IsNull { column: String },
    /// IS NOT NULL check
    IsNotNull { column: String },
    /// IN list check
    InList {
        column: String,
        values: Vec<SqlValue>,
    },
    /// Case-insensitive pattern match
    Like(LikeFilter),
    /// AND combination
    And(Box<Filter>, Box<Filter>),
    /// OR combination
    Or(Box<Filter>, Box<Filter>),
    /// NOT negation
    Not(Box<Filter>),
    /// Raw SQL written with the target dialect's markers (use with caution)
    Raw { sql: String, params: Vec<SqlValue> },
}

impl Filter {
    fn compare<V: ToSqlValue>(column: &str, op: CompareOp, value: V) -> Self {
        Self::Compare {
            column: column.to_string(),
            op,
            value: value.to_sql_value(),
        }
    }

    /// Creates an equality filter (column = value).
    #[must_use]
    pub fn eq<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    /// Creates an inequality filter (column <> value).
    #[must_use]
    pub fn ne<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    /// Creates a greater-than filter.
    #[must_use]
    pub fn gt<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal filter.
    #[must_use]
    pub fn gte<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    /// Creates a less-than filter.
    #[must_use]
    pub fn lt<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal filter.
    #[must_use]
    pub fn lte<V: ToSqlValue>(column: &str, value: V) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    /// Creates an IS NULL filter.
    #[must_use]
    pub fn is_null(column: &str) -> Self {
        Self::IsNull {
            column: column.to_string(),
        }
    }

    /// Creates an IS NOT NULL filter.
    #[must_use]
    pub fn is_not_null(column: &str) -> Self {
        Self::IsNotNull {
            column: column.to_string(),
        }
    }

    /// Creates an IN list filter.
    #[must_use]
    pub fn in_list<V: ToSqlValue>(column: &str, values: Vec<V>) -> Self {
        Self::InList {
            column: column.to_string(),
            values: values.into_iter().map(ToSqlValue::to_sql_value).collect(),
        }
    }

    /// Case-insensitive substring match.
    #[must_use]
    pub fn contains(column: &str, value: &str) -> Self {
        Self::Like(LikeFilter::new(column, value, LikeMode::Contains))
    }

    /// Case-insensitive prefix match.
    #[must_use]
    pub fn starts_with(column: &str, value: &str) -> Self {
        Self::Like(LikeFilter::new(column, value, LikeMode::Starts))
    }

    /// Case-insensitive suffix match.
    #[must_use]
    pub fn ends_with(column: &str, value: &str) -> Self {
        Self::Like(LikeFilter::new(column, value, LikeMode::Ends))
    }

    /// Case-insensitive whole-value match.
    #[must_use]
    pub fn iexact(column: &str, value: &str) -> Self {
        Self::Like(LikeFilter::new(column, value, LikeMode::Exact))
    }

    /// Creates a raw SQL filter expression.
    #[must_use]
    pub fn raw(sql: &str, params: Vec<SqlValue>) -> Self {
        Self::Raw {
            sql: sql.to_string(),
            params,
        }
    }

    /// Combines this filter with another using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Combines this filter with another using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Negates this filter. A pattern match folds the negation into its
    /// operator (`NOT SIMILAR TO`, `NOT LIKE`) instead of wrapping it.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Self::Like(like) => {
                let negate = !like.negate;
                Self::Like(like.negated(negate))
            }
            other => Self::Not(Box::new(other)),
        }
    }

    /// Renders the filter, allocating its parameters in order.
    pub fn render_with(&self, params: &mut ParamAllocator<'_>) -> String {
        match self {
            Self::Compare { column, op, value } => {
                let placeholder = params.allocate(value.clone());
                format!("{column} {op} {placeholder}")
            }
            Self::IsNull { column } => format!("{column} IS NULL"),
            Self::IsNotNull { column } => format!("{column} IS NOT NULL"),
            Self::InList { column, values } => {
                if values.is_empty() {
                    return String::from("1 = 0");
                }
                let placeholders: Vec<String> =
                    values.iter().map(|v| params.allocate(v.clone())).collect();
                format!("{column} IN ({})", placeholders.join(", "))
            }
            Self::Like(like) => like.render_with(params),
            Self::And(left, right) => {
                let left_sql = left.render_with(params);
                let right_sql = right.render_with(params);
                format!("({left_sql}) AND ({right_sql})")
            }
            Self::Or(left, right) => {
                let left_sql = left.render_with(params);
                let right_sql = right.render_with(params);
                format!("({left_sql}) OR ({right_sql})")
            }
            Self::Not(inner) => format!("NOT ({})", inner.render_with(params)),
            Self::Raw { sql, params: raw } => {
                for value in raw {
                    params.allocate(value.clone());
                }
                sql.clone()
            }
        }
    }

    /// Renders the filter on its own, returning SQL and parameters.
    #[must_use]
    pub fn render(&self, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
        let mut params = ParamAllocator::new(dialect);
        let sql = self.render_with(&mut params);
        (sql, params.into_params())
    }
}

impl From<LikeFilter> for Filter {
    fn from(like: LikeFilter) -> Self {
        Self::Like(like)
    }
}
