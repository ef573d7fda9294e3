//! Dataset divider: ARFF in, reproducible train/validation/test ARFF out.
//!
//! This umbrella crate re-exports the divider-* crates behind one API. All
//! crates are Layer 0 and pure: no I/O happens outside the explicit file
//! helpers in [`arff`].
//!
//! # Quick Start
//!
//! ```
//! use divider::prelude::*;
//!
//! let text = "@RELATION toy\n\
//!             @ATTRIBUTE x NUMERIC\n\
//!             @ATTRIBUTE label {A,B}\n\
//!             @DATA\n\
//!             1,A\n2,A\n3,A\n4,A\n5,A\n6,A\n7,B\n8,B\n9,B\n10,B\n";
//!
//! // Decode
//! let doc = decode_str(text, &DecodeParams::default()).unwrap();
//!
//! // Split, stratified on the suggested column
//! let column = suggest_stratify_column(&doc.table).unwrap();
//! let config = SplitConfig::default().with_stratify_column(column);
//! let result = split(&doc.table, &config).unwrap();
//!
//! // Encode each subset
//! let train = encode(&result.train, "toy_train", &EncodeParams::default()).unwrap();
//! assert!(train.starts_with("@RELATION toy_train"));
//! assert_eq!(result.record().train_rows, 6);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Tabular model: `Table`, `Value`, `TableBuilder`
//! - [`arff`] - ARFF decode/encode, attribute typing, file helpers
//! - [`split`] - Splitting, stratification outcome, dataset analysis

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Tabular model: `Table`, `Value`, `ValueKey`, `TableBuilder`.
pub use divider_types as types;

/// ARFF decode/encode, attribute typing and file helpers.
pub use divider_arff as arff;

/// Splitting, stratification outcome, dataset analysis.
pub use divider_split as split;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for dividing datasets.
///
/// # Usage
///
/// ```
/// use divider::prelude::*;
/// ```
pub mod prelude {
    // Tabular model
    pub use divider_types::{Table, TableBuilder, Value};

    // Codec
    pub use divider_arff::{
        decode_bytes, decode_str, encode, load_arff, save_arff, ArffDocument, ArffError,
        DecodeParams, EncodeParams,
    };

    // Splitting and analysis
    pub use divider_split::{
        column_types, split, suggest_stratify_column, DatasetInfo, SplitConfig, SplitError,
        SplitRecord, SplitResult, StratifyOutcome,
    };
}

// =============================================================================
// Tests
// =============================================================================
