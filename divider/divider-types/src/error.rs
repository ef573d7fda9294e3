//! Error types for table construction and access.

use thiserror::Error;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur while building or slicing a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row does not carry exactly one value per column.
    #[error("row {row} has {got} values, expected {expected}")]
    RowWidth {
        /// Zero-based row index.
        row: usize,
        /// Number of columns in the table.
        expected: usize,
        /// Number of values in the row.
        got: usize,
    },

    /// Two columns share a name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A row index passed to a selection is outside the table.
    #[error("row index {index} out of range for table with {len} rows")]
    RowOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of rows in the table.
        len: usize,
    },
}

impl TableError {
    /// Creates a row width error.
    #[must_use]
    pub const fn row_width(row: usize, expected: usize, got: usize) -> Self {
        Self::RowWidth { row, expected, got }
    }

    /// Creates a duplicate column error.
    #[must_use]
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_row_width() {
        let err = TableError::row_width(3, 4, 2);
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("expected 4"));
    }

    #[test]
    fn error_duplicate_column() {
        let err = TableError::duplicate_column("label");
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn error_row_out_of_range() {
        let err = TableError::RowOutOfRange { index: 10, len: 5 };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains('5'));
    }
}
