//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. The [`Dialect`]
//! trait is the contract an engine adapter implements so that the query
//! compiler in this crate (and any host compiler) can render pagination,
//! parameter markers, string casts and case-insensitive matching without
//! knowing which engine it targets.
//!
//! Implementations are expected to be stateless: every method is a pure
//! function of its arguments, so one dialect value can be shared by any
//! number of concurrent compilations.

mod generic;

pub use generic::GenericDialect;

/// How a case-insensitive match anchors its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LikeMode {
    /// Match anywhere: wildcards on both sides.
    #[default]
    Contains,
    /// Match a prefix: trailing wildcard only.
    Starts,
    /// Match a suffix: leading wildcard only.
    Ends,
    /// Match the whole value: no wildcards.
    Exact,
}

impl LikeMode {
    /// Parses the filter operator names used by query hosts
    /// (`contains`, `startsWith`, `endsWith`, `equals` and short forms).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contains" => Some(Self::Contains),
            "starts" | "startsWith" => Some(Self::Starts),
            "ends" | "endsWith" => Some(Self::Ends),
            "exact" | "equals" => Some(Self::Exact),
            _ => None,
        }
    }

    /// Whether the pattern gets a `%` before the value.
    #[must_use]
    pub const fn leading_wildcard(self) -> bool {
        matches!(self, Self::Contains | Self::Ends)
    }

    /// Whether the pattern gets a `%` after the value.
    #[must_use]
    pub const fn trailing_wildcard(self) -> bool {
        matches!(self, Self::Contains | Self::Starts)
    }

    /// Builds the pattern expression around a bound parameter, using
    /// string concatenation so the parameter itself stays a plain value.
    ///
    /// `Contains` with `?` gives `'%' || ? || '%'`.
    #[must_use]
    pub fn wrap(self, placeholder: &str) -> String {
        let mut pattern = String::new();
        if self.leading_wildcard() {
            pattern.push_str("'%' || ");
        }
        pattern.push_str(placeholder);
        if self.trailing_wildcard() {
            pattern.push_str(" || '%'");
        }
        pattern
    }
}

/// Escapes every character of `metachars` (and the escape character
/// itself) in `value` by prefixing it with `escape`.
#[must_use]
pub fn escape_with(value: &str, metachars: &[char], escape: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == escape || metachars.contains(&c) {
            out.push(escape);
        }
        out.push(c);
    }
    out
}

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let doubled: String = [quote, quote].iter().collect();
        let escaped = name.replace(quote, &doubled);
        format!("{quote}{escaped}{quote}")
    }

    /// Returns the marker for the positional parameter at `index`
    /// (zero-based). Engines with anonymous markers ignore the index and
    /// bind strictly by order.
    fn parameter_placeholder(&self, index: usize) -> String {
        let _ = index;
        String::from("?")
    }

    /// Renders the row-window clause. Returns an empty string when neither
    /// a limit nor an offset applies.
    fn pagination(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        let offset = offset.filter(|o| *o > 0);
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(l), None) => format!("LIMIT {l}"),
            (None, Some(o)) => format!("OFFSET {o}"),
            (Some(l), Some(o)) => format!("LIMIT {l} OFFSET {o}"),
        }
    }

    /// Wraps an expression in a cast to the engine's widest practical
    /// string type.
    fn cast_to_string(&self, expr: &str) -> String {
        format!("CAST({expr} AS VARCHAR)")
    }

    /// Escape character declared in the `ESCAPE` clause of pattern matches.
    fn pattern_escape(&self) -> char {
        '\\'
    }

    /// Escapes pattern metacharacters in a user-supplied value so it
    /// matches literally once embedded in a pattern.
    fn escape_pattern(&self, value: &str) -> String {
        escape_with(value, &['%', '_'], self.pattern_escape())
    }

    /// Renders a case-insensitive pattern match of `column` against the
    /// parameter behind `placeholder`.
    fn like_ignore_case(
        &self,
        column: &str,
        negate: bool,
        placeholder: &str,
        mode: LikeMode,
    ) -> String {
        let not = if negate { " NOT" } else { "" };
        format!(
            "LOWER({column}){not} LIKE LOWER({}) ESCAPE '{}'",
            mode.wrap(placeholder),
            self.pattern_escape()
        )
    }

    /// Wraps a complete query so it returns at most `limit` rows.
    fn wrap_query_with_limit(&self, sql: &str, limit: u64) -> String {
        format!("SELECT * FROM ({sql}) AS t LIMIT {limit}")
    }

    /// A trivial query used as a liveness check.
    fn test_query(&self) -> &'static str {
        "SELECT 1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_mode_wrap() {
        assert_eq!(LikeMode::Contains.wrap("?"), "'%' || ? || '%'");
        assert_eq!(LikeMode::Starts.wrap("?"), "? || '%'");
        assert_eq!(LikeMode::Ends.wrap("?"), "'%' || ?");
        assert_eq!(LikeMode::Exact.wrap("?"), "?");
    }

    #[test]
    fn test_like_mode_parse() {
        assert_eq!(LikeMode::parse("contains"), Some(LikeMode::Contains));
        assert_eq!(LikeMode::parse("startsWith"), Some(LikeMode::Starts));
        assert_eq!(LikeMode::parse("ends"), Some(LikeMode::Ends));
        assert_eq!(LikeMode::parse("equals"), Some(LikeMode::Exact));
        assert_eq!(LikeMode::parse("gt"), None);
        assert_eq!(LikeMode::default(), LikeMode::Contains);
    }

    #[test]
    fn test_escape_with() {
        assert_eq!(escape_with("50%_off", &['%', '_'], '\\'), "50\\%\\_off");
        assert_eq!(escape_with("a\\b", &['%'], '\\'), "a\\\\b");
        assert_eq!(escape_with("plain", &['%'], '\\'), "plain");
    }
}
