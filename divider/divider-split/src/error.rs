//! Error types for divider-split.

use divider_types::TableError;
use thiserror::Error;

/// Errors that can occur while splitting a table.
///
/// A stratification fallback is not an error; it is reported on the
/// [`SplitResult`](crate::SplitResult).
#[derive(Debug, Error)]
pub enum SplitError {
    /// The table has no rows or no columns.
    #[error("dataset is empty: {rows} rows, {columns} columns")]
    EmptyDataset {
        /// Row count of the input.
        rows: usize,
        /// Column count of the input.
        columns: usize,
    },

    /// A subset table could not be assembled.
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// A split configuration file could not be parsed.
    #[error("invalid split config: {0}")]
    Config(String),
}

impl SplitError {
    /// Creates an empty dataset error.
    #[must_use]
    pub const fn empty_dataset(rows: usize, columns: usize) -> Self {
        Self::EmptyDataset { rows, columns }
    }

    /// Creates a config error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true for [`SplitError::EmptyDataset`].
    #[must_use]
    pub const fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset { .. })
    }
}

/// Result type for divider-split operations.
pub type Result<T> = std::result::Result<T, SplitError>;
