//! Dataset analysis: column typing and stratify column heuristics.
//!
//! The numeric/categorical split here is coarser than ARFF attribute typing
//! and independent of it.

use std::fmt;

use divider_types::{Table, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fewest distinct values a stratify column may have.
pub const MIN_STRATIFY_CLASSES: usize = 2;

/// Most distinct values a stratify column may have.
pub const MAX_STRATIFY_CLASSES: usize = 10;

/// Name fragments (case-insensitive) that mark a likely target column.
pub const TARGET_KEYWORDS: [&str; 5] = ["class", "target", "label", "type", "category"];

/// Column names partitioned by value domain, each list in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTypes {
    /// Columns holding no text values (all-null columns included).
    pub numeric: Vec<String>,
    /// Columns holding at least one text value.
    pub categorical: Vec<String>,
}

/// Classifies every column as numeric or categorical.
///
/// # Example
///
/// ```
/// use divider_split::column_types;
/// use divider_types::{TableBuilder, Value};
///
/// let table = TableBuilder::new(["x", "label"])
///     .row(vec![Value::from(1.0), Value::from("A")])
///     .build()
///     .unwrap();
///
/// let types = column_types(&table);
/// assert_eq!(types.numeric, ["x"]);
/// assert_eq!(types.categorical, ["label"]);
/// ```
#[must_use]
pub fn column_types(table: &Table) -> ColumnTypes {
    let mut types = ColumnTypes::default();
    for (idx, name) in table.columns().iter().enumerate() {
        if table.column_values(idx).any(|v| matches!(v, Value::Text(_))) {
            types.categorical.push(name.clone());
        } else {
            types.numeric.push(name.clone());
        }
    }
    types
}

/// Returns true if the name contains one of [`TARGET_KEYWORDS`].
#[must_use]
pub fn has_target_keyword(name: &str) -> bool {
    let lower = name.to_lowercase();
    TARGET_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn class_count_in_range(table: &Table, name: &str) -> Option<usize> {
    let idx = table.column_index(name)?;
    let classes = table.distinct_count(idx);
    (MIN_STRATIFY_CLASSES..=MAX_STRATIFY_CLASSES)
        .contains(&classes)
        .then_some(classes)
}

/// Suggests a default stratify column.
///
/// Scans categorical columns in column order and returns the first whose
/// distinct non-null count lies in `[2, 10]`; then numeric columns the same
/// way. The scan returns on the first match, so a keyword-named column
/// (see [`TARGET_KEYWORDS`]) only wins over columns after it.
/// [`stratification_candidates`] lists every qualifying column instead.
#[must_use]
pub fn suggest_stratify_column(table: &Table) -> Option<String> {
    let types = column_types(table);
    for name in types.categorical.iter().chain(&types.numeric) {
        let Some(classes) = class_count_in_range(table, name) else {
            continue;
        };
        let keyword = has_target_keyword(name);
        debug!(column = %name, classes, keyword, "suggested stratify column");
        return Some(name.clone());
    }
    None
}

/// A column that could serve as a stratify column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratifyCandidate {
    /// Column name.
    pub column: String,
    /// Distinct non-null values.
    pub classes: usize,
    /// Whether the column is categorical.
    pub categorical: bool,
    /// Whether the name contains a target keyword.
    pub keyword: bool,
}

/// Lists every column whose distinct non-null count lies in `[2, 10]`,
/// categorical columns first, each group in column order.
#[must_use]
pub fn stratification_candidates(table: &Table) -> Vec<StratifyCandidate> {
    let types = column_types(table);
    let categorical = types.categorical.iter().map(|name| (name, true));
    let numeric = types.numeric.iter().map(|name| (name, false));

    categorical
        .chain(numeric)
        .filter_map(|(name, categorical)| {
            class_count_in_range(table, name).map(|classes| StratifyCandidate {
                column: name.clone(),
                classes,
                categorical,
                keyword: has_target_keyword(name),
            })
        })
        .collect()
}

/// Shape and composition of a table.
///
/// # Example
///
/// ```
/// use divider_split::DatasetInfo;
/// use divider_types::{TableBuilder, Value};
///
/// let table = TableBuilder::new(["x", "label"])
///     .row(vec![Value::from(1.0), Value::from("A")])
///     .row(vec![Value::Null, Value::from("B")])
///     .build()
///     .unwrap();
///
/// let info = DatasetInfo::from_table(&table);
/// assert_eq!(info.rows, 2);
/// assert_eq!(info.missing_values, [("x".to_string(), 1), ("label".to_string(), 0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Row count.
    pub rows: usize,
    /// Column count.
    pub columns: usize,
    /// Column names in order.
    pub column_names: Vec<String>,
    /// Numeric columns.
    pub numeric_columns: Vec<String>,
    /// Categorical columns.
    pub categorical_columns: Vec<String>,
    /// Null count per column, in column order.
    pub missing_values: Vec<(String, usize)>,
}

impl DatasetInfo {
    /// Collects info for a table.
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let types = column_types(table);
        let missing_values = table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), table.null_count(idx)))
            .collect();

        Self {
            rows: table.row_count(),
            columns: table.column_count(),
            column_names: table.columns().to_vec(),
            numeric_columns: types.numeric,
            categorical_columns: types.categorical,
            missing_values,
        }
    }

    /// Total null values across all columns.
    #[must_use]
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for DatasetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}, Columns: {}", self.rows, self.columns)?;
        writeln!(f, "  numeric: {}", self.numeric_columns.join(", "))?;
        writeln!(f, "  categorical: {}", self.categorical_columns.join(", "))?;
        write!(f, "  missing values: {}", self.total_missing())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use divider_types::TableBuilder;

    /// Builds a table from named columns of equal length.
    fn table_of(columns: Vec<(&str, Vec<Value>)>) -> Table {
        let rows = columns.first().map_or(0, |(_, v)| v.len());
        let mut builder = TableBuilder::new(columns.iter().map(|(name, _)| *name));
        for r in 0..rows {
            builder.push_row(columns.iter().map(|(_, v)| v[r].clone()).collect());
        }
        builder.build().unwrap()
    }

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::from(*s)).collect()
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|n| Value::from(*n)).collect()
    }

    #[test]
    fn column_types_split() {
        let table = table_of(vec![
            ("n", numbers(&[1.0, 2.0, 3.0])),
            ("c", texts(&["a", "b", "a"])),
            ("empty", vec![Value::Null; 3]),
            ("mixed", vec![Value::from(1.0), Value::from("x"), Value::Null]),
        ]);
        let types = column_types(&table);
        assert_eq!(types.numeric, ["n", "empty"]);
        assert_eq!(types.categorical, ["c", "mixed"]);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(has_target_keyword("Class"));
        assert!(has_target_keyword("PetType"));
        assert!(has_target_keyword("y_label"));
        assert!(!has_target_keyword("sepal_length"));
    }

    #[test]
    fn suggest_prefers_categorical() {
        let table = table_of(vec![
            ("n", numbers(&[1.0, 2.0, 1.0, 2.0])),
            ("c", texts(&["a", "b", "a", "b"])),
        ]);
        assert_eq!(suggest_stratify_column(&table).as_deref(), Some("c"));
    }

    #[test]
    fn suggest_first_match_wins_over_keyword() {
        let table = table_of(vec![
            ("color", texts(&["r", "g", "r", "g"])),
            ("class", texts(&["x", "y", "x", "y"])),
        ]);
        assert_eq!(suggest_stratify_column(&table).as_deref(), Some("color"));
    }

    #[test]
    fn suggest_skips_out_of_range_columns() {
        let ids: Vec<String> = (0..12).map(|i| format!("id{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let table = table_of(vec![
            ("constant", texts(&["k"; 12])),
            ("id", texts(&id_refs)),
            ("bucket", numbers(&[0., 1., 2., 0., 1., 2., 0., 1., 2., 0., 1., 2.])),
        ]);
        assert_eq!(suggest_stratify_column(&table).as_deref(), Some("bucket"));
    }

    #[test]
    fn suggest_none_when_nothing_qualifies() {
        let table = table_of(vec![("constant", texts(&["k", "k"]))]);
        assert_eq!(suggest_stratify_column(&table), None);
    }

    #[test]
    fn candidates_list_every_qualifying_column() {
        let table = table_of(vec![
            ("n", numbers(&[1.0, 2.0, 1.0, 2.0])),
            ("color", texts(&["r", "g", "b", "r"])),
            ("constant", texts(&["k", "k", "k", "k"])),
            ("class", texts(&["x", "y", "x", "y"])),
        ]);
        let candidates = stratification_candidates(&table);
        let names: Vec<&str> = candidates.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, ["color", "class", "n"]);
        assert_eq!(candidates[0].classes, 3);
        assert!(candidates[1].keyword);
        assert!(!candidates[2].categorical);
    }

    #[test]
    fn dataset_info_counts() {
        let table = table_of(vec![
            ("n", vec![Value::from(1.0), Value::Null, Value::Null]),
            ("c", texts(&["a", "b", "a"])),
        ]);
        let info = DatasetInfo::from_table(&table);
        assert_eq!(info.rows, 3);
        assert_eq!(info.columns, 2);
        assert_eq!(info.column_names, ["n", "c"]);
        assert_eq!(info.numeric_columns, ["n"]);
        assert_eq!(info.categorical_columns, ["c"]);
        assert_eq!(info.total_missing(), 2);
        assert!(info.to_string().contains("Rows: 3, Columns: 2"));
    }
}
