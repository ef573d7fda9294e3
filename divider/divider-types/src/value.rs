//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// The variant is fixed when the cell is constructed; consumers never
/// re-infer a cell's type from its textual form.
///
/// # Example
///
/// ```
/// use divider_types::Value;
///
/// assert!(Value::Null.is_null());
/// assert_eq!(Value::from(2.5).as_number(), Some(2.5));
/// assert_eq!(Value::from("A").as_text(), Some("A"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    /// Numeric value.
    Number(f64),
    /// Textual (nominal or free string) value.
    Text(String),
}

impl Value {
    /// Returns true if the value is missing.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the value is numeric.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns the numeric payload, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the hashable identity of this value.
    #[must_use]
    pub fn key(&self) -> ValueKey {
        match self {
            Self::Null => ValueKey::Null,
            Self::Number(n) => ValueKey::number(*n),
            Self::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Hashable, totally ordered identity of a [`Value`].
///
/// Numbers are keyed by their bit pattern, with `-0.0` folded into `0.0`
/// so that equal numbers share a key. The ordering is stable but is not
/// numeric ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    /// Key of a missing value.
    Null,
    /// Key of a numeric value (IEEE-754 bits).
    Number(u64),
    /// Key of a text value.
    Text(String),
}

impl ValueKey {
    fn number(n: f64) -> Self {
        // -0.0 == 0.0 but their bit patterns differ
        let n = if n == 0.0 { 0.0 } else { n };
        Self::Number(n.to_bits())
    }

    /// Reconstructs the value this key identifies.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Number(bits) => Value::Number(f64::from_bits(*bits)),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert!(Value::from(1.0).is_number());
        assert_eq!(Value::from(3).as_number(), Some(3.0));
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::from("x").as_number(), None);
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn value_from_option() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".to_string()));
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(2.0).to_string(), "2");
        assert_eq!(Value::from("abc").to_string(), "abc");
    }

    #[test]
    fn key_folds_negative_zero() {
        assert_eq!(Value::from(0.0).key(), Value::from(-0.0).key());
        assert_ne!(Value::from(1.0).key(), Value::from(-1.0).key());
    }

    #[test]
    fn key_distinguishes_variants() {
        assert_ne!(Value::from("1").key(), Value::from(1.0).key());
        assert_ne!(Value::Null.key(), Value::from("").key());
    }

    #[test]
    fn key_to_value_roundtrip() {
        for value in [Value::Null, Value::from(4.25), Value::from("cat")] {
            assert_eq!(value.key().to_value(), value);
        }
    }

    #[test]
    fn value_serialization() {
        let row = vec![Value::Null, Value::from(1.5), Value::from("A")];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,1.5,"A"]"#);

        let parsed: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, row);
    }
}
