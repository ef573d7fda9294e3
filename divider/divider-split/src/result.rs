//! Split output, stratification outcome and the split record.

use std::fmt;

use divider_types::Table;
use serde::{Deserialize, Serialize};

/// Stratify column value recorded when no stratification was applied.
pub const NO_STRATIFY_SENTINEL: &str = "none";

/// The two partition draws of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStage {
    /// Full table into train and holdout.
    Initial,
    /// Holdout into validation and test.
    Holdout,
}

impl fmt::Display for SplitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Holdout => write!(f, "holdout"),
        }
    }
}

/// Why a draw could not be stratified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum FallbackReason {
    /// The least populated class has fewer members than the two subsets of
    /// the draw.
    LeastPopulatedClass {
        /// Members of the least populated class.
        members: usize,
    },
    /// One side of the draw is smaller than the number of classes.
    TooFewRowsForClasses {
        /// Rows on the smaller side of the draw.
        rows: usize,
        /// Distinct classes in the rows being split.
        classes: usize,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeastPopulatedClass { members } => write!(
                f,
                "least populated class has {members} member(s), fewer than the 2 subsets"
            ),
            Self::TooFewRowsForClasses { rows, classes } => {
                write!(f, "a subset of {rows} row(s) cannot hold {classes} classes")
            }
        }
    }
}

/// One draw that fell back to unstratified partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratificationFallback {
    /// Which draw fell back.
    pub stage: SplitStage,
    /// Why.
    pub reason: FallbackReason,
}

impl fmt::Display for StratificationFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} draw: {}", self.stage, self.reason)
    }
}

/// What happened to a stratification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum StratifyOutcome {
    /// No stratify column was configured.
    NotRequested,
    /// The configured column does not exist; the split ran unstratified.
    ColumnMissing {
        /// The requested column name.
        column: String,
    },
    /// Both draws were stratified.
    Stratified {
        /// The stratify column.
        column: String,
    },
    /// At least one draw fell back to unstratified partitioning.
    FellBack {
        /// The stratify column.
        column: String,
        /// Draws that fell back, in order.
        fallbacks: Vec<StratificationFallback>,
    },
}

impl StratifyOutcome {
    /// Returns true if any draw fell back to unstratified partitioning.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        matches!(self, Self::FellBack { .. })
    }

    /// The column that stratification was applied on, if any draw used it.
    #[must_use]
    pub fn applied_column(&self) -> Option<&str> {
        match self {
            Self::Stratified { column } | Self::FellBack { column, .. } => Some(column),
            Self::NotRequested | Self::ColumnMissing { .. } => None,
        }
    }

    /// Draws that fell back, empty unless [`Self::fell_back`].
    #[must_use]
    pub fn fallbacks(&self) -> &[StratificationFallback] {
        match self {
            Self::FellBack { fallbacks, .. } => fallbacks,
            _ => &[],
        }
    }
}

impl fmt::Display for StratifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "not stratified"),
            Self::ColumnMissing { column } => {
                write!(f, "not stratified (column '{column}' not found)")
            }
            Self::Stratified { column } => write!(f, "stratified on '{column}'"),
            Self::FellBack { column, fallbacks } => {
                write!(f, "stratified on '{column}' with fallback (")?;
                for (i, fallback) in fallbacks.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{fallback}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The three subsets produced by [`split`](crate::split).
///
/// Subsets are fresh tables; the input is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    /// Training subset (about 60% of rows).
    pub train: Table,
    /// Validation subset (about 20% of rows).
    pub validation: Table,
    /// Test subset (about 20% of rows).
    pub test: Table,
    /// Outcome of the stratification request.
    pub stratification: StratifyOutcome,
    /// Seed the split ran with.
    pub random_seed: u64,
    /// Whether rows were shuffled.
    pub shuffle: bool,
}

impl SplitResult {
    /// Total rows across the three subsets.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.train.row_count() + self.validation.row_count() + self.test.row_count()
    }

    /// Returns true if stratification fell back on any draw.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.stratification.fell_back()
    }

    /// Builds the record-keeping summary of this split.
    #[must_use]
    pub fn record(&self) -> SplitRecord {
        SplitRecord {
            train_rows: self.train.row_count(),
            validation_rows: self.validation.row_count(),
            test_rows: self.test.row_count(),
            stratify_column: self
                .stratification
                .applied_column()
                .unwrap_or(NO_STRATIFY_SENTINEL)
                .to_string(),
            random_seed: self.random_seed,
            shuffle: self.shuffle,
            stratification_fell_back: self.fell_back(),
        }
    }
}

impl fmt::Display for SplitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train: {}, validation: {}, test: {} ({})",
            self.train.row_count(),
            self.validation.row_count(),
            self.test.row_count(),
            self.stratification
        )
    }
}

/// What a split did, for persistence alongside the written subsets.
///
/// # Example
///
/// ```
/// use divider_split::{split, SplitConfig};
/// use divider_types::{TableBuilder, Value};
///
/// let mut builder = TableBuilder::new(["x"]);
/// for i in 0..10 {
///     builder.push_row(vec![Value::from(i)]);
/// }
/// let table = builder.build().unwrap();
///
/// let record = split(&table, &SplitConfig::default()).unwrap().record();
/// assert_eq!(record.train_rows, 6);
/// assert_eq!(record.stratify_column, "none");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Rows in the training subset.
    pub train_rows: usize,
    /// Rows in the validation subset.
    pub validation_rows: usize,
    /// Rows in the test subset.
    pub test_rows: usize,
    /// Column stratified on, or `"none"`.
    pub stratify_column: String,
    /// Seed used.
    pub random_seed: u64,
    /// Whether rows were shuffled.
    pub shuffle: bool,
    /// Whether any draw fell back to unstratified partitioning.
    pub stratification_fell_back: bool,
}

impl SplitRecord {
    /// Total rows across the three subsets.
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.train_rows + self.validation_rows + self.test_rows
    }
}
