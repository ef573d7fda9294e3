//! Parameters for ARFF decoding and encoding.

use serde::{Deserialize, Serialize};

/// Default upper bound on distinct values for a nominal attribute.
pub const DEFAULT_NOMINAL_THRESHOLD: usize = 20;

/// What to do with a data record that does not match the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Fail the whole decode on the first malformed record.
    #[default]
    Reject,
    /// Drop malformed records and report them alongside the table.
    Skip,
}

/// Parameters for decoding ARFF text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeParams {
    /// Handling of malformed data records. Default: reject.
    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,
}

impl DecodeParams {
    /// Params that drop malformed records instead of failing.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            malformed_rows: MalformedRowPolicy::Skip,
        }
    }

    /// Set the malformed record policy.
    #[must_use]
    pub const fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }
}

/// Parameters for encoding a table as ARFF text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeParams {
    /// A non-numeric column with at most this many distinct values is
    /// declared nominal; above it, `STRING`. Default: 20.
    pub nominal_threshold: usize,
}

impl Default for EncodeParams {
    fn default() -> Self {
        Self {
            nominal_threshold: DEFAULT_NOMINAL_THRESHOLD,
        }
    }
}

impl EncodeParams {
    /// Set the nominal threshold.
    #[must_use]
    pub const fn with_nominal_threshold(mut self, threshold: usize) -> Self {
        self.nominal_threshold = threshold;
        self
    }
}
