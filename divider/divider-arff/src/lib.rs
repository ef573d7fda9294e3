//! ARFF codec for divider.
//!
//! Reads and writes the Attribute-Relation File Format used by Weka:
//!
//! - **Decode**: header (`@RELATION`, `@ATTRIBUTE`, `@DATA`), dense and sparse
//!   records, comments, quoted tokens with backslash escapes
//! - **Encode**: per-column type inference (numeric, boolean, nominal,
//!   string) and deterministic output
//! - **Files**: `load_arff` / `save_arff` with extension checks
//!
//! # Layer 0 Crate
//!
//! Pure Rust with no framework dependencies. Usable from CLI tools, servers
//! or other data pipelines.
//!
//! # Example
//!
//! ```
//! use divider_arff::{decode_str, encode, DecodeParams, EncodeParams};
//!
//! let text = "@RELATION weather\n\
//!             @ATTRIBUTE temp NUMERIC\n\
//!             @ATTRIBUTE play {yes,no}\n\
//!             @DATA\n\
//!             21.5,yes\n\
//!             ?,no\n";
//!
//! let doc = decode_str(text, &DecodeParams::default()).unwrap();
//! assert_eq!(doc.table.row_count(), 2);
//!
//! let out = encode(&doc.table, &doc.relation, &EncodeParams::default()).unwrap();
//! assert!(out.starts_with("@RELATION weather"));
//! ```
//!
//! # Lossy Encoding
//!
//! Text is sanitized before it is written: CR/LF/TAB become a space and
//! commas become `;`. Empty text is written as the missing marker `?`.
//! Everything else round-trips exactly.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod attribute;
mod decode;
mod encode;
mod error;
mod params;
mod token;

pub use attribute::{infer_attributes, Attribute, AttributeType, BOOLEAN_LABELS};
pub use decode::{decode_bytes, decode_str, ArffDocument, MalformedRow};
pub use encode::{encode, encode_with_attributes};
pub use error::{ArffError, ArffResult, FormatError};
pub use params::{DecodeParams, EncodeParams, MalformedRowPolicy, DEFAULT_NOMINAL_THRESHOLD};

use std::fs;
use std::path::Path;

use divider_types::Table;
use tracing::info;

/// The ARFF file format, recognized by its `.arff` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArffFormat;

impl ArffFormat {
    /// Canonical file extension.
    pub const EXTENSION: &'static str = "arff";

    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// Returns `None` for any extension other than `.arff`.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        ext.eq_ignore_ascii_case(Self::EXTENSION).then_some(Self)
    }
}

fn check_extension(path: &Path) -> ArffResult<()> {
    if ArffFormat::from_path(path).is_some() {
        return Ok(());
    }
    Err(ArffError::UnknownFormat {
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })
}

/// Load an ARFF file with default decode parameters.
///
/// # Errors
///
/// See [`load_arff_with`].
pub fn load_arff<P: AsRef<Path>>(path: P) -> ArffResult<ArffDocument> {
    load_arff_with(path, &DecodeParams::default())
}

/// Load an ARFF file.
///
/// # Errors
///
/// Returns an error if:
/// - the path does not end in `.arff` ([`ArffError::UnknownFormat`])
/// - the file does not exist ([`ArffError::FileNotFound`])
/// - the file cannot be read
/// - the content is not valid ARFF ([`ArffError::Format`])
pub fn load_arff_with<P: AsRef<Path>>(path: P, params: &DecodeParams) -> ArffResult<ArffDocument> {
    let path = path.as_ref();
    check_extension(path)?;

    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArffError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArffError::Io(e)
        }
    })?;

    let doc = decode_bytes(&bytes, params)?;
    info!(
        path = %path.display(),
        relation = %doc.relation,
        rows = doc.table.row_count(),
        columns = doc.table.column_count(),
        skipped = doc.malformed_rows.len(),
        "loaded ARFF file"
    );
    Ok(doc)
}

/// Save a table as an ARFF file with default encode parameters.
///
/// # Errors
///
/// See [`save_arff_with`].
pub fn save_arff<P: AsRef<Path>>(table: &Table, relation: &str, path: P) -> ArffResult<()> {
    save_arff_with(table, relation, path, &EncodeParams::default())
}

/// Save a table as an ARFF file.
///
/// The document is fully encoded before the file is created, so an
/// encoding error leaves nothing on disk.
///
/// # Errors
///
/// Returns an error if the path does not end in `.arff`, the table cannot be
/// encoded, or the file cannot be written.
pub fn save_arff_with<P: AsRef<Path>>(
    table: &Table,
    relation: &str,
    path: P,
    params: &EncodeParams,
) -> ArffResult<()> {
    let path = path.as_ref();
    check_extension(path)?;

    let text = encode(table, relation, params)?;
    fs::write(path, text.as_bytes())?;

    info!(
        path = %path.display(),
        relation,
        rows = table.row_count(),
        "saved ARFF file"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use divider_types::{TableBuilder, Value};
    use tempfile::TempDir;

    fn sample() -> Table {
        TableBuilder::new(["sepal", "species"])
            .row(vec![Value::from(5.1), Value::from("setosa")])
            .row(vec![Value::from(6.3), Value::from("virginica")])
            .build()
            .unwrap()
    }

    #[test]
    fn format_from_path() {
        assert_eq!(ArffFormat::from_path("iris.arff"), Some(ArffFormat));
        assert_eq!(ArffFormat::from_path("IRIS.ARFF"), Some(ArffFormat));
        assert_eq!(ArffFormat::from_path("iris.csv"), None);
        assert_eq!(ArffFormat::from_path("iris"), None);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iris.arff");

        save_arff(&sample(), "iris", &path).unwrap();
        let doc = load_arff(&path).unwrap();

        assert_eq!(doc.relation, "iris");
        assert_eq!(doc.table, sample());
        assert!(!doc.has_malformed_rows());
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_arff(dir.path().join("absent.arff")).unwrap_err();
        assert!(matches!(err, ArffError::FileNotFound { .. }));
    }

    #[test]
    fn load_rejects_other_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\n").unwrap();

        let err = load_arff(&path).unwrap_err();
        assert!(matches!(err, ArffError::UnknownFormat { ref extension } if extension == "csv"));
    }

    #[test]
    fn save_rejects_other_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let err = save_arff(&sample(), "r", &path).unwrap_err();
        assert!(matches!(err, ArffError::UnknownFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.arff");
        let table = TableBuilder::new(["x"])
            .row(vec![Value::from(f64::INFINITY)])
            .build()
            .unwrap();

        assert!(save_arff(&table, "r", &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn load_lenient_reports_skipped_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messy.arff");
        fs::write(
            &path,
            "@relation m\n@attribute x numeric\n@data\n1\nnope\n3\n",
        )
        .unwrap();

        assert!(load_arff(&path).unwrap_err().is_format());

        let doc = load_arff_with(&path, &DecodeParams::lenient()).unwrap();
        assert_eq!(doc.table.row_count(), 2);
        assert_eq!(doc.malformed_rows.len(), 1);
        assert_eq!(doc.malformed_rows[0].line, 5);
    }
}
