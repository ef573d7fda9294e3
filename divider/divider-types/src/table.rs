//! Tables: ordered named columns and rows of matching width.

use hashbrown::HashSet;
use serde::Serialize;

use crate::error::{TableError, TableResult};
use crate::value::{Value, ValueKey};

/// An immutable table of values.
///
/// Invariants, checked at construction:
/// - every row holds exactly one value per column
/// - column names are unique
///
/// Column order and row order are preserved as given. Operations that
/// reorder or subset rows return a new table.
///
/// # Example
///
/// ```
/// use divider_types::{Table, Value};
///
/// let table = Table::new(
///     vec!["label".to_string()],
///     vec![vec![Value::from("A")], vec![Value::from("B")], vec![Value::from("A")]],
/// )
/// .unwrap();
///
/// assert_eq!(table.distinct_count(0), 2);
///
/// let subset = table.select_rows(&[2, 0]).unwrap();
/// assert_eq!(subset.row_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates a table from column names and rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a column name repeats or a row's width differs
    /// from the number of columns.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> TableResult<Self> {
        {
            let mut seen = HashSet::with_capacity(columns.len());
            for name in &columns {
                if !seen.insert(name.as_str()) {
                    return Err(TableError::duplicate_column(name.clone()));
                }
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::row_width(idx, columns.len(), row.len()));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates a table with the given columns and no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if a column name repeats.
    pub fn empty(columns: Vec<String>) -> TableResult<Self> {
        Self::new(columns, Vec::new())
    }

    /// Column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns a single row.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Value]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the values of one column, top to bottom.
    ///
    /// Yields nothing if `index` is out of range.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Distinct non-null values of a column in first-appearance order.
    #[must_use]
    pub fn distinct_values(&self, index: usize) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.column_values(index)
            .filter(|v| !v.is_null())
            .filter(|v| seen.insert(v.key()))
            .cloned()
            .collect()
    }

    /// Number of distinct non-null values in a column.
    #[must_use]
    pub fn distinct_count(&self, index: usize) -> usize {
        self.column_values(index)
            .filter(|v| !v.is_null())
            .map(Value::key)
            .collect::<HashSet<ValueKey>>()
            .len()
    }

    /// Number of null values in a column.
    #[must_use]
    pub fn null_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|v| v.is_null()).count()
    }

    /// Builds a new table holding the given rows, in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of range.
    pub fn select_rows(&self, indices: &[usize]) -> TableResult<Self> {
        let rows = indices
            .iter()
            .map(|&index| {
                self.rows
                    .get(index)
                    .cloned()
                    .ok_or(TableError::RowOutOfRange {
                        index,
                        len: self.rows.len(),
                    })
            })
            .collect::<TableResult<Vec<_>>>()?;

        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Consumes the table, returning columns and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// Incremental table builder.
///
/// Rows are collected without checks; validation happens once in
/// [`TableBuilder::build`].
///
/// # Example
///
/// ```
/// use divider_types::{TableBuilder, Value};
///
/// let table = TableBuilder::new(["a", "b"])
///     .row(vec![Value::from(1.0), Value::from("x")])
///     .row(vec![Value::from(2.0), Value::Null])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.row_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableBuilder {
    /// Creates a builder with the given column names.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a column name (builder style).
    ///
    /// Rows pushed earlier are not widened; add columns before rows.
    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Appends a row (builder style).
    #[must_use]
    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }

    /// Appends a row.
    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    /// Number of rows collected so far.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Validates and builds the table.
    ///
    /// # Errors
    ///
    /// See [`Table::new`].
    pub fn build(self) -> TableResult<Table> {
        Table::new(self.columns, self.rows)
    }
}
