//! Error types for the driver.

use std::time::Duration;

use oxide_sql_core::DecodeError;
use thiserror::Error;

/// Broad classification of a [`DriverError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No pool slot freed up within the acquire timeout.
    PoolExhausted,
    /// The pool has been shut down.
    PoolClosed,
    /// The engine rejected the SQL or its parameters.
    Query,
    /// A new session could not be opened.
    Connect,
    /// The query did not finish within its timeout.
    Timeout,
    /// Returning a connection to the pool failed.
    ReleaseWarning,
    /// A result row did not have the expected shape.
    Decode,
}

/// Driver errors.
///
/// Engine failures are mapped into these variants by the connection
/// implementations; raw engine errors never cross the driver boundary.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No pool slot freed up within the acquire timeout.
    #[error("connection pool exhausted: no connection available within {timeout:?}")]
    PoolExhausted {
        /// The acquire timeout that elapsed.
        timeout: Duration,
    },

    /// The pool has been shut down.
    #[error("connection pool is closed")]
    PoolClosed,

    /// The engine rejected the SQL or its parameters.
    #[error("query error{}: {message}", .code.as_ref().map(|c| format!(" [{c}]")).unwrap_or_default())]
    Query {
        /// Engine error code, when the engine reports one.
        code: Option<String>,
        /// Engine error message, verbatim.
        message: String,
    },

    /// A new session could not be opened.
    #[error("connection error: {0}")]
    Connect(String),

    /// The query did not finish within its timeout.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// Returning a connection to the pool failed. Logged, never returned
    /// from a query.
    #[error("error while releasing connection: {0}")]
    ReleaseWarning(String),

    /// A result row did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl DriverError {
    /// Creates a query error.
    #[must_use]
    pub fn query(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Query {
            code,
            message: message.into(),
        }
    }

    /// Returns the error's kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PoolExhausted { .. } => ErrorKind::PoolExhausted,
            Self::PoolClosed => ErrorKind::PoolClosed,
            Self::Query { .. } => ErrorKind::Query,
            Self::Connect(_) => ErrorKind::Connect,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::ReleaseWarning(_) => ErrorKind::ReleaseWarning,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Whether the caller may retry the operation as is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::PoolExhausted | ErrorKind::Connect | ErrorKind::Timeout
        )
    }
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = DriverError::query(Some("335544569".into()), "Dynamic SQL Error");
        assert_eq!(err.to_string(), "query error [335544569]: Dynamic SQL Error");
        let err = DriverError::query(None, "syntax error");
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_retry_classification() {
        let exhausted = DriverError::PoolExhausted {
            timeout: Duration::from_millis(10),
        };
        assert_eq!(exhausted.kind(), ErrorKind::PoolExhausted);
        assert!(exhausted.is_retryable());
        assert!(!DriverError::PoolClosed.is_retryable());
        assert!(!DriverError::query(None, "bad").is_retryable());
        assert!(DriverError::Timeout(Duration::from_secs(1)).is_retryable());
    }

    #[test]
    fn test_decode_conversion() {
        let err: DriverError = DecodeError::MissingColumn("table_name".into()).into();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.to_string(), "decode error: missing column 'table_name'");
    }
}
