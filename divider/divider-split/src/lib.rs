//! Train/validation/test splitting for divider.
//!
//! This crate partitions a [`Table`](divider_types::Table) into three
//! disjoint subsets:
//!
//! # Splitting
//!
//! - [`split`] - 60/20/20 split, optionally stratified on a column
//! - [`SplitConfig`] - Seed, shuffle flag and stratify column
//! - [`SplitResult`] - The three subsets plus the [`StratifyOutcome`]
//! - [`SplitRecord`] - What happened, for persistence
//!
//! # Analysis
//!
//! - [`column_types`] - Numeric vs categorical columns
//! - [`suggest_stratify_column`] - Heuristic default stratify column
//! - [`stratification_candidates`] - Every plausible stratify column
//! - [`DatasetInfo`] - Shape and missing-value counts
//! - [`ClassDistribution`] / [`SplitDistribution`] - Class counts per subset
//!
//! # Layer 0 Crate
//!
//! Pure and synchronous. Every call seeds its own generator, so concurrent
//! splits never share random state.
//!
//! # Example
//!
//! ```
//! use divider_split::{split, SplitConfig};
//! use divider_types::{TableBuilder, Value};
//!
//! let mut builder = TableBuilder::new(["x", "label"]);
//! for i in 0..20 {
//!     let label = if i % 4 == 0 { "rare" } else { "common" };
//!     builder.push_row(vec![Value::from(i), Value::from(label)]);
//! }
//! let table = builder.build().unwrap();
//!
//! let config = SplitConfig::default().with_stratify_column("label");
//! let result = split(&table, &config).unwrap();
//!
//! assert_eq!(result.total_rows(), 20);
//! assert_eq!(result.train.row_count(), 12);
//! assert!(!result.fell_back());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod analyze;
mod config;
mod error;
mod result;
mod split;
mod summary;

// Re-export split API
pub use config::{
    SplitConfig, DEFAULT_SEED, HOLDOUT_FRACTION, TEST_FRACTION_OF_HOLDOUT, TRAIN_FRACTION,
};
pub use result::{
    FallbackReason, SplitRecord, SplitResult, SplitStage, StratificationFallback,
    StratifyOutcome, NO_STRATIFY_SENTINEL,
};
pub use split::{held_out_count, split};

// Re-export analysis
pub use analyze::{
    column_types, has_target_keyword, stratification_candidates, suggest_stratify_column,
    ColumnTypes, DatasetInfo, StratifyCandidate, MAX_STRATIFY_CLASSES, MIN_STRATIFY_CLASSES,
    TARGET_KEYWORDS,
};
pub use summary::{ClassDistribution, SplitDistribution};

// Re-export error types
pub use error::{Result, SplitError};
