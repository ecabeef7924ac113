//! Shared dialects for the contract tests.

use oxide_sql_core::{Dialect, LikeMode};

/// Numbered `$n` markers and `ILIKE`, the shape of a PostgreSQL-like engine.
pub struct Numbered;

impl Dialect for Numbered {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn parameter_placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        placeholder: &str,
        mode: LikeMode,
    ) -> String {
        let not = if negate { " NOT" } else { "" };
        format!("{column}{not} ILIKE {}", mode.wrap(placeholder))
    }
}

/// Renders pagination as a row window, to check the compiler only ever
/// asks the dialect for it.
pub struct Windowed;

impl Dialect for Windowed {
    fn name(&self) -> &'static str {
        "windowed"
    }

    fn pagination(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (l, o) => format!("WINDOW {}..{}", o.unwrap_or(0), l.unwrap_or(0)),
        }
    }

    fn cast_to_string(&self, expr: &str) -> String {
        format!("STR({expr})")
    }
}
