//! SQLite dialect implementation.

use oxide_sql_core::dialect::{Dialect, LikeMode};

/// SQLite dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quote(&self) -> char {
        '"' // SQLite also accepts backticks, but double quotes are standard
    }

    fn pagination(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let offset = offset.filter(|o| *o > 0);
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(l), None) => format!("LIMIT {l}"),
            (None, Some(o)) => format!("LIMIT -1 OFFSET {o}"),
            (Some(l), Some(o)) => format!("LIMIT {l} OFFSET {o}"),
        }
    }

    fn cast_to_string(&self, expr: &str) -> String {
        format!("CAST({expr} AS TEXT)")
    }

    // LIKE ignores ASCII case natively.
    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        placeholder: &str,
        mode: LikeMode,
    ) -> String {
        let not = if negate { " NOT" } else { "" };
        format!(
            "{column}{not} LIKE {} ESCAPE '{}'",
            mode.wrap(placeholder),
            self.pattern_escape()
        )
    }
}
