//! Error types for decoding engine results.

use thiserror::Error;

/// A result row did not have the shape a decoder expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The row has no column with this name.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// The column holds a value of another kind.
    #[error("column '{column}' holds {found}, expected {expected}")]
    UnexpectedType {
        /// Column name.
        column: String,
        /// Expected value kind.
        expected: &'static str,
        /// Kind actually found.
        found: &'static str,
    },
}
