//! Reading ARFF input at the process boundary.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use divider::arff::{decode_bytes, ArffDocument, ArffFormat, DecodeParams, MalformedRowPolicy};
use owo_colors::OwoColorize;

/// Largest input file accepted, in bytes (50 MiB).
pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Reads and decodes an ARFF file, enforcing the extension and size limits.
pub fn load(path: &Path, lenient: bool) -> Result<ArffDocument> {
    if ArffFormat::from_path(path).is_none() {
        bail!("{} is not an .arff file", path.display());
    }

    let size = fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?
        .len();
    if size > MAX_INPUT_BYTES {
        bail!(
            "{} is {} bytes, above the {} byte limit",
            path.display(),
            size,
            MAX_INPUT_BYTES
        );
    }

    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;

    let policy = if lenient {
        MalformedRowPolicy::Skip
    } else {
        MalformedRowPolicy::Reject
    };
    let params = DecodeParams::default().with_malformed_rows(policy);
    let doc = decode_bytes(&bytes, &params)
        .with_context(|| format!("cannot decode {}", path.display()))?;

    for row in &doc.malformed_rows {
        eprintln!(
            "{} skipped line {}: {}",
            "warning:".yellow().bold(),
            row.line,
            row.reason
        );
    }

    Ok(doc)
}

/// File stem used to name outputs, `dataset` if the path has none.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "dataset".to_string(), |s| s.to_string_lossy().into_owned())
}
