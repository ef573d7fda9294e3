//! Class distribution summaries for a column, before and after a split.

use std::fmt;

use divider_types::{Table, ValueKey};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::result::SplitResult;

/// Counts of each value of one column.
///
/// Labels use the value's display form (`null` for missing) and keep
/// first-appearance order.
///
/// # Example
///
/// ```
/// use divider_split::ClassDistribution;
/// use divider_types::{TableBuilder, Value};
///
/// let table = TableBuilder::new(["label"])
///     .row(vec![Value::from("B")])
///     .row(vec![Value::from("A")])
///     .row(vec![Value::from("B")])
///     .build()
///     .unwrap();
///
/// let dist = ClassDistribution::of(&table, "label").unwrap();
/// assert_eq!(dist.counts, [("B".to_string(), 2), ("A".to_string(), 1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDistribution {
    /// Label and count per class.
    pub counts: Vec<(String, usize)>,
    /// Rows counted.
    pub total: usize,
}

impl ClassDistribution {
    /// Counts the classes of a column. Returns `None` if the column does not
    /// exist.
    #[must_use]
    pub fn of(table: &Table, column: &str) -> Option<Self> {
        let idx = table.column_index(column)?;
        let mut slots: HashMap<ValueKey, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for value in table.column_values(idx) {
            let slot = *slots.entry(value.key()).or_insert_with(|| {
                counts.push((value.to_string(), 0));
                counts.len() - 1
            });
            counts[slot].1 += 1;
        }

        Some(Self {
            counts,
            total: table.row_count(),
        })
    }

    /// Number of distinct classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.counts.len()
    }

    /// Count for a label, zero if absent.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, n)| *n)
    }

    /// Share of rows carrying a label, in `[0, 1]`. Zero for an empty set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn proportion(&self, label: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(label) as f64 / self.total as f64
    }
}

/// Class distribution of one column across the original table and each
/// subset of a split.
///
/// This is the data behind distribution plots; nothing here renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDistribution {
    /// Column summarized.
    pub column: String,
    /// Distribution in the input table.
    pub original: ClassDistribution,
    /// Distribution in the training subset.
    pub train: ClassDistribution,
    /// Distribution in the validation subset.
    pub validation: ClassDistribution,
    /// Distribution in the test subset.
    pub test: ClassDistribution,
}

impl SplitDistribution {
    /// Summarizes `column` across a split. Returns `None` if the column is not
    /// in `original`.
    #[must_use]
    pub fn from_result(original: &Table, result: &SplitResult, column: &str) -> Option<Self> {
        Some(Self {
            column: column.to_string(),
            original: ClassDistribution::of(original, column)?,
            train: ClassDistribution::of(&result.train, column)?,
            validation: ClassDistribution::of(&result.validation, column)?,
            test: ClassDistribution::of(&result.test, column)?,
        })
    }

    /// Largest absolute gap between a class's share in any non-empty subset
    /// and its share in the original table.
    #[must_use]
    pub fn max_deviation(&self) -> f64 {
        let subsets = [&self.train, &self.validation, &self.test];
        let mut worst = 0.0_f64;
        for (label, _) in &self.original.counts {
            let expected = self.original.proportion(label);
            for subset in subsets.iter().filter(|s| s.total > 0) {
                worst = worst.max((subset.proportion(label) - expected).abs());
            }
        }
        worst
    }
}

impl fmt::Display for SplitDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>9} {:>9} {:>10} {:>9}",
            self.column, "original", "train", "validation", "test"
        )?;
        for (label, count) in &self.original.counts {
            writeln!(
                f,
                "{:<16} {:>9} {:>9} {:>10} {:>9}",
                label,
                count,
                self.train.count(label),
                self.validation.count(label),
                self.test.count(label)
            )?;
        }
        write!(
            f,
            "{:<16} {:>9} {:>9} {:>10} {:>9}",
            "total", self.original.total, self.train.total, self.validation.total, self.test.total
        )
    }
}
