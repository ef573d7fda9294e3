//! Split configuration and fixed proportions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitError};

/// Share of rows kept for training by the first draw.
pub const TRAIN_FRACTION: f64 = 0.6;

/// Share of rows held out by the first draw (validation plus test).
pub const HOLDOUT_FRACTION: f64 = 0.4;

/// Share of the holdout that becomes the test set in the second draw.
pub const TEST_FRACTION_OF_HOLDOUT: f64 = 0.5;

/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;

/// Configuration for one split invocation.
///
/// Proportions are not configurable per call; see [`TRAIN_FRACTION`].
///
/// # Example
///
/// ```
/// use divider_split::SplitConfig;
///
/// let config = SplitConfig::default()
///     .with_seed(7)
///     .with_stratify_column("label");
///
/// assert_eq!(config.random_seed, 7);
/// assert!(config.shuffle);
/// assert_eq!(config.stratify_column.as_deref(), Some("label"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Seed for every random draw. Default: 42.
    pub random_seed: u64,

    /// Whether rows are permuted before partitioning. Default: true.
    pub shuffle: bool,

    /// Column whose class frequencies each subset should preserve.
    pub stratify_column: Option<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_SEED,
            shuffle: true,
            stratify_column: None,
        }
    }
}

impl SplitConfig {
    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Sets whether rows are shuffled.
    #[must_use]
    pub const fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Disables shuffling.
    #[must_use]
    pub const fn without_shuffle(self) -> Self {
        self.with_shuffle(false)
    }

    /// Requests stratification on the named column.
    #[must_use]
    pub fn with_stratify_column(mut self, column: impl Into<String>) -> Self {
        self.stratify_column = Some(column.into());
        self
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SplitError::config(e.to_string()))
    }

    /// Serializes the config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::Config`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SplitError::config(e.to_string()))
    }
}
