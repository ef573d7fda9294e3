//! Tabular data model for the dataset divider.
//!
//! This crate defines the in-memory table shared by the ARFF codec and the
//! splitter:
//!
//! - [`Value`] - A single cell: `Null`, `Number` or `Text`
//! - [`ValueKey`] - Hashable, ordered identity of a value (distinct counts, class grouping)
//! - [`Table`] - Ordered named columns plus rows of matching width
//! - [`TableBuilder`] - Incremental construction with deferred validation
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **no I/O and no framework dependencies**. It can be used in:
//! - Codecs
//! - Splitting and sampling pipelines
//! - CLI tools
//! - Servers
//!
//! # Example
//!
//! ```
//! use divider_types::{Table, Value};
//!
//! let table = Table::new(
//!     vec!["x".to_string(), "label".to_string()],
//!     vec![
//!         vec![Value::from(1.0), Value::from("A")],
//!         vec![Value::Null, Value::from("B")],
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.column_index("label"), Some(1));
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod table;
mod value;

pub use error::{TableError, TableResult};
pub use table::{Table, TableBuilder};
pub use value::{Value, ValueKey};
