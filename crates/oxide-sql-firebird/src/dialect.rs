//! Firebird dialect implementation.

use oxide_sql_core::dialect::{escape_with, Dialect, LikeMode};

/// Window size used when a query has an offset but no limit.
///
/// `ROWS m TO n` is inclusive at both ends, so the rendered window spans
/// `limit + 1` rows. A limit of 0 therefore still yields `ROWS 1 TO 1`, one
/// row; hosts that need an empty result skip the query instead.
pub const DEFAULT_WINDOW: u64 = 10_000;

/// Characters with a special meaning in a `SIMILAR TO` pattern.
pub const PATTERN_METACHARS: &[char] = &[
    '_', '%', '[', ']', '(', ')', '{', '}', '|', '^', '-', '+', '*', '?',
];

/// Firebird dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirebirdDialect;

impl FirebirdDialect {
    /// Creates a new Firebird dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
    }

    /// Renders `ROWS <start> TO <start + limit>`.
    ///
    /// A missing or zero offset starts the window at row 1 and a missing
    /// limit spans [`DEFAULT_WINDOW`] rows. With neither, no clause is
    /// rendered.
    fn pagination(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let offset = offset.filter(|o| *o > 0);
        if limit.is_none() && offset.is_none() {
            return String::new();
        }
        let start = offset.unwrap_or(1);
        let window = limit.unwrap_or(DEFAULT_WINDOW);
        format!("ROWS {start} TO {}", start.saturating_add(window))
    }

    fn cast_to_string(&self, expr: &str) -> String {
        format!("CAST({expr} AS VARCHAR(32767))")
    }

    /// Folds the value to upper case, then escapes the `SIMILAR TO`
    /// metacharacters. The column side is folded by `UPPER` in
    /// [`Dialect::like_ignore_case`].
    fn escape_pattern(&self, value: &str) -> String {
        escape_with(&value.to_uppercase(), PATTERN_METACHARS, self.pattern_escape())
    }

    /// Firebird has no `ILIKE`; the match goes through `SIMILAR TO`, which
    /// treats the whole value as the pattern, so wildcards are concatenated
    /// around the bound parameter.
    ///
    /// `SIMILAR TO` is case-sensitive under the default collations. The
    /// column is wrapped in `UPPER` and the bound value arrives already
    /// upper-cased from [`Dialect::escape_pattern`], which leaves the marker
    /// itself untyped.
    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        placeholder: &str,
        mode: LikeMode,
    ) -> String {
        let not = if negate { " NOT" } else { "" };
        format!(
            "UPPER({column}){not} SIMILAR TO {} ESCAPE '{}'",
            mode.wrap(placeholder),
            self.pattern_escape()
        )
    }

    fn wrap_query_with_limit(&self, sql: &str, limit: u64) -> String {
        format!("SELECT * FROM ({sql}) AS t ROWS 1 TO {limit}")
    }

    fn test_query(&self) -> &'static str {
        "SELECT 1 FROM RDB$DATABASE"
    }
}
