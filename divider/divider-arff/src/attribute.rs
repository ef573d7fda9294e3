//! Attribute descriptors and type inference.

use std::fmt;

use divider_types::{Table, Value};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::params::EncodeParams;
use crate::token::{quote, quote_name, sanitize};

/// Default spellings of a boolean enumeration, used for a polarity the
/// column never shows.
pub const BOOLEAN_LABELS: [&str; 2] = ["False", "True"];

/// ARFF attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum AttributeType {
    /// `NUMERIC` (also read from `REAL` and `INTEGER`).
    Numeric,
    /// `STRING`.
    String,
    /// Enumerated nominal set `{v1,v2,...}`.
    Nominal(Vec<String>),
    /// `DATE` with an optional format; values are kept as text.
    Date(Option<String>),
}

impl AttributeType {
    /// Returns true for `NUMERIC`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Returns the nominal labels, if this is a nominal type.
    #[must_use]
    pub fn nominal_values(&self) -> Option<&[String]> {
        match self {
            Self::Nominal(values) => Some(values),
            _ => None,
        }
    }

    /// Returns true for a nominal set whose labels are all `true`/`false`
    /// spellings, with both polarities present.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.nominal_values().is_some_and(|values| {
            let flags: Vec<Option<bool>> = values.iter().map(|v| parse_bool(v)).collect();
            flags.iter().all(Option::is_some)
                && flags.contains(&Some(false))
                && flags.contains(&Some(true))
        })
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "NUMERIC"),
            Self::String => write!(f, "STRING"),
            Self::Date(None) => write!(f, "DATE"),
            Self::Date(Some(format)) => write!(f, "DATE {}", quote(format)),
            Self::Nominal(values) => {
                let labels: Vec<String> = values.iter().map(|v| quote(v)).collect();
                write!(f, "{{{}}}", labels.join(","))
            }
        }
    }
}

/// A column name plus its ARFF type.
///
/// # Example
///
/// ```
/// use divider_arff::{Attribute, AttributeType};
///
/// let attr = Attribute::nominal("class", ["yes", "no"]);
/// assert_eq!(attr.to_string(), "@ATTRIBUTE class {'yes','no'}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute (column) name.
    pub name: String,
    /// Declared type.
    pub kind: AttributeType,
}

impl Attribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AttributeType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a `NUMERIC` attribute.
    #[must_use]
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::Numeric)
    }

    /// Creates a `STRING` attribute.
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttributeType::String)
    }

    /// Creates a nominal attribute.
    #[must_use]
    pub fn nominal<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            AttributeType::Nominal(values.into_iter().map(Into::into).collect()),
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@ATTRIBUTE {} {}", quote_name(&self.name), self.kind)
    }
}

/// Infers one attribute per column, in column order.
///
/// Per column, over all observed values:
/// 1. every non-null value numeric: `NUMERIC`
/// 2. every non-null value a case-insensitive `true`/`false`: a boolean
///    set of the observed spellings, false ones first, with
///    [`BOOLEAN_LABELS`] standing in for a polarity that never appears
/// 3. at most `nominal_threshold` distinct sanitized labels: nominal set in
///    first-appearance order
/// 4. otherwise `STRING`
///
/// Empty text counts as null. An all-null column is `NUMERIC`.
#[must_use]
pub fn infer_attributes(table: &Table, params: &EncodeParams) -> Vec<Attribute> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| Attribute::new(name.clone(), infer_column(table, idx, params)))
        .collect()
}

fn infer_column(table: &Table, index: usize, params: &EncodeParams) -> AttributeType {
    let present: Vec<&Value> = table
        .column_values(index)
        .filter(|v| !is_absent(v))
        .collect();

    if present.iter().all(|v| v.is_number()) {
        return AttributeType::Numeric;
    }

    if present
        .iter()
        .all(|v| v.as_text().is_some_and(|s| parse_bool(s).is_some()))
    {
        return AttributeType::Nominal(boolean_labels(&present));
    }

    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for value in present {
        let label = nominal_label(value);
        if seen.insert(label.clone()) {
            labels.push(label);
            if labels.len() > params.nominal_threshold {
                return AttributeType::String;
            }
        }
    }
    AttributeType::Nominal(labels)
}

fn boolean_labels(present: &[&Value]) -> Vec<String> {
    let mut spellings: [Vec<String>; 2] = [Vec::new(), Vec::new()];
    for text in present.iter().filter_map(|v| v.as_text()) {
        if let Some(flag) = parse_bool(text) {
            let seen = &mut spellings[usize::from(flag)];
            if !seen.iter().any(|s| s == text) {
                seen.push(text.to_string());
            }
        }
    }

    for (flag, seen) in spellings.iter_mut().enumerate() {
        if seen.is_empty() {
            seen.push(BOOLEAN_LABELS[flag].to_string());
        }
    }

    let [falses, trues] = spellings;
    falses.into_iter().chain(trues).collect()
}

/// Null, or text that would render as nothing.
pub(crate) fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::Number(_) => false,
    }
}

/// The sanitized label a value takes inside a nominal set.
pub(crate) fn nominal_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Text(s) => sanitize(s).into_owned(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use divider_types::TableBuilder;

    fn infer_single(values: Vec<Value>, threshold: usize) -> AttributeType {
        let mut builder = TableBuilder::new(["c"]);
        for value in values {
            builder.push_row(vec![value]);
        }
        let table = builder.build().unwrap();
        let params = EncodeParams::default().with_nominal_threshold(threshold);
        infer_attributes(&table, &params).remove(0).kind
    }

    #[test]
    fn numeric_column() {
        let kind = infer_single(vec![Value::from(1.0), Value::Null, Value::from(2.5)], 20);
        assert_eq!(kind, AttributeType::Numeric);
    }

    #[test]
    fn all_null_column_is_numeric() {
        let kind = infer_single(vec![Value::Null, Value::from("")], 20);
        assert_eq!(kind, AttributeType::Numeric);
    }

    #[test]
    fn nominal_column_in_appearance_order() {
        let kind = infer_single(
            vec![
                Value::from("b"),
                Value::from("a"),
                Value::from("b"),
                Value::Null,
            ],
            20,
        );
        assert_eq!(
            kind,
            AttributeType::Nominal(vec!["b".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn string_column_above_threshold() {
        let values = (0..5).map(|i| Value::from(format!("v{i}"))).collect();
        assert_eq!(infer_single(values, 4), AttributeType::String);

        let values = (0..4).map(|i| Value::from(format!("v{i}"))).collect();
        assert!(matches!(infer_single(values, 4), AttributeType::Nominal(_)));
    }

    #[test]
    fn boolean_column() {
        let kind = infer_single(
            vec![Value::from("true"), Value::from("FALSE"), Value::from("True")],
            20,
        );
        assert!(kind.is_boolean());
        assert_eq!(
            kind.nominal_values().unwrap(),
            ["FALSE", "true", "True"]
        );
    }

    #[test]
    fn boolean_column_keeps_observed_spelling() {
        let kind = infer_single(vec![Value::from("TRUE"), Value::from("FALSE")], 20);
        assert_eq!(
            kind,
            AttributeType::Nominal(vec!["FALSE".to_string(), "TRUE".to_string()])
        );
    }

    #[test]
    fn boolean_column_fills_unseen_polarity() {
        let kind = infer_single(vec![Value::from("yes"), Value::from("no")], 20);
        assert!(!kind.is_boolean());

        let kind = infer_single(vec![Value::from("true"), Value::Null], 20);
        assert!(kind.is_boolean());
        assert_eq!(kind.nominal_values().unwrap(), ["False", "true"]);
    }

    #[test]
    fn mixed_column_uses_rendered_numbers() {
        let kind = infer_single(vec![Value::from(1.0), Value::from("x")], 20);
        assert_eq!(
            kind,
            AttributeType::Nominal(vec!["1".to_string(), "x".to_string()])
        );
    }

    #[test]
    fn sanitized_labels_collapse() {
        let kind = infer_single(vec![Value::from("a,b"), Value::from("a;b")], 20);
        assert_eq!(kind, AttributeType::Nominal(vec!["a;b".to_string()]));
    }

    #[test]
    fn attribute_display() {
        assert_eq!(
            Attribute::numeric("sepal length").to_string(),
            "@ATTRIBUTE 'sepal length' NUMERIC"
        );
        assert_eq!(Attribute::string("notes").to_string(), "@ATTRIBUTE notes STRING");
        assert_eq!(
            Attribute::new("when", AttributeType::Date(Some("yyyy-MM-dd".to_string())))
                .to_string(),
            "@ATTRIBUTE when DATE 'yyyy-MM-dd'"
        );
    }

    #[test]
    fn attribute_serialization() {
        let attr = Attribute::nominal("class", ["a", "b"]);
        let json = serde_json::to_string(&attr).unwrap();
        let parsed: Attribute = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, attr);
    }
}
