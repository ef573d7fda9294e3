//! ARFF encoding.
//!
//! Output is deterministic: attributes follow column order, records follow
//! row order, and every text value is single-quoted.
//!
//! # Lossy Steps
//!
//! Encoding is the inverse of decoding except for:
//! - sanitization of text: CR/LF/TAB become a space,
//!   commas become `;`
//! - empty text, which is written as `?` and reads back as null
//! - numbers in a nominal or string column, which read back as text

use divider_types::{Table, Value};
use tracing::debug;

use crate::attribute::{infer_attributes, is_absent, nominal_label, Attribute, AttributeType};
use crate::error::{ArffError, ArffResult};
use crate::params::EncodeParams;
use crate::token::{quote, quote_name};

/// Encodes a table as ARFF text, inferring attribute types.
///
/// # Errors
///
/// Returns [`ArffError::Encoding`] if the table has no columns or holds a
/// non-finite number.
///
/// # Example
///
/// ```
/// use divider_arff::{encode, EncodeParams};
/// use divider_types::{TableBuilder, Value};
///
/// let table = TableBuilder::new(["x", "label"])
///     .row(vec![Value::from(1.5), Value::from("A")])
///     .build()
///     .unwrap();
///
/// let text = encode(&table, "demo", &EncodeParams::default()).unwrap();
/// assert!(text.contains("@ATTRIBUTE x NUMERIC"));
/// assert!(text.contains("1.5,'A'"));
/// ```
pub fn encode(table: &Table, relation: &str, params: &EncodeParams) -> ArffResult<String> {
    let attributes = infer_attributes(table, params);
    encode_with_attributes(table, relation, &attributes)
}

/// Encodes a table against explicit attribute declarations.
///
/// # Errors
///
/// Returns [`ArffError::Encoding`] if:
/// - the table has no columns, or attribute count differs from column count
/// - a numeric attribute holds text or a non-finite number
/// - a nominal attribute holds a value outside its declared set
pub fn encode_with_attributes(
    table: &Table,
    relation: &str,
    attributes: &[Attribute],
) -> ArffResult<String> {
    if table.column_count() == 0 {
        return Err(ArffError::encoding(relation, "table has no columns"));
    }
    if attributes.len() != table.column_count() {
        return Err(ArffError::encoding(
            relation,
            format!(
                "{} attributes declared for {} columns",
                attributes.len(),
                table.column_count()
            ),
        ));
    }

    let mut out = String::new();
    out.push_str("@RELATION ");
    out.push_str(&quote_name(relation));
    out.push_str("\n\n");

    for attribute in attributes {
        out.push_str(&attribute.to_string());
        out.push('\n');
    }

    out.push_str("\n@DATA\n");

    let mut cells = Vec::with_capacity(attributes.len());
    for (row_idx, row) in table.rows().iter().enumerate() {
        cells.clear();
        for (value, attribute) in row.iter().zip(attributes) {
            cells.push(render_value(value, attribute, row_idx)?);
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    debug!(
        relation,
        attributes = attributes.len(),
        rows = table.row_count(),
        bytes = out.len(),
        "encoded ARFF document"
    );

    Ok(out)
}

fn render_value(value: &Value, attribute: &Attribute, row: usize) -> ArffResult<String> {
    if is_absent(value) {
        return Ok("?".to_string());
    }

    match (&attribute.kind, value) {
        (_, Value::Number(n)) if !n.is_finite() => Err(ArffError::encoding_at(
            &attribute.name,
            row,
            format!("non-finite number {n}"),
        )),
        (AttributeType::Numeric, Value::Number(n)) => Ok(n.to_string()),
        (AttributeType::Numeric, _) => Err(ArffError::encoding_at(
            &attribute.name,
            row,
            format!("text '{value}' in numeric attribute"),
        )),
        (AttributeType::Nominal(labels), _) => {
            let label = nominal_label(value);
            if labels.contains(&label) {
                return Ok(quote(&label));
            }
            Err(ArffError::encoding_at(
                &attribute.name,
                row,
                format!("'{label}' is not a declared nominal value"),
            ))
        }
        (AttributeType::String | AttributeType::Date(_), _) => Ok(quote(&nominal_label(value))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decode::decode_str;
    use crate::params::DecodeParams;
    use divider_types::TableBuilder;

    fn roundtrip(table: &Table) -> Table {
        let text = encode(table, "rt", &EncodeParams::default()).unwrap();
        decode_str(&text, &DecodeParams::default()).unwrap().table
    }

    #[test]
    fn encode_layout() {
        let table = TableBuilder::new(["x", "label", "note"])
            .row(vec![Value::from(1.0), Value::from("A"), Value::Null])
            .row(vec![Value::Null, Value::from("B"), Value::from("it's")])
            .build()
            .unwrap();

        let text = encode(&table, "demo set", &EncodeParams::default()).unwrap();
        let expected = "@RELATION 'demo set'

@ATTRIBUTE x NUMERIC
@ATTRIBUTE label {'A','B'}
@ATTRIBUTE note {'it\\'s'}

@DATA
1,'A',?
?,'B','it\\'s'
";
        assert_eq!(text, expected);
    }

    #[test]
    fn encode_is_deterministic() {
        let table = TableBuilder::new(["a", "b"])
            .row(vec![Value::from("z"), Value::from(3.25)])
            .row(vec![Value::from("y"), Value::from(-1.0)])
            .build()
            .unwrap();
        let params = EncodeParams::default();
        assert_eq!(
            encode(&table, "r", &params).unwrap(),
            encode(&table, "r", &params).unwrap()
        );
    }

    #[test]
    fn roundtrip_exact_without_hazards() {
        let table = TableBuilder::new(["num", "cat", "free"])
            .row(vec![Value::from(0.1), Value::from("red"), Value::from("a \"b\" c")])
            .row(vec![Value::from(-2.5e-7), Value::Null, Value::from("back\\slash")])
            .row(vec![Value::Null, Value::from("blue"), Value::from("?")])
            .build()
            .unwrap();
        assert_eq!(roundtrip(&table), table);
    }

    #[test]
    fn roundtrip_sanitizes_hazards() {
        let table = TableBuilder::new(["text"])
            .row(vec![Value::from("a,b")])
            .row(vec![Value::from("line1\nline2")])
            .row(vec![Value::from("")])
            .build()
            .unwrap();

        let back = roundtrip(&table);
        assert_eq!(back.rows()[0][0], Value::from("a;b"));
        assert_eq!(back.rows()[1][0], Value::from("line1 line2"));
        assert_eq!(back.rows()[2][0], Value::Null);
    }

    #[test]
    fn string_attribute_above_threshold() {
        let mut builder = TableBuilder::new(["id"]);
        for i in 0..5 {
            builder.push_row(vec![Value::from(format!("row-{i}"))]);
        }
        let table = builder.build().unwrap();

        let params = EncodeParams::default().with_nominal_threshold(3);
        let text = encode(&table, "r", &params).unwrap();
        assert!(text.contains("@ATTRIBUTE id STRING"));

        let doc = decode_str(&text, &DecodeParams::default()).unwrap();
        assert_eq!(doc.table, table);
    }

    #[test]
    fn boolean_column_keeps_spelling() {
        let table = TableBuilder::new(["flag"])
            .row(vec![Value::from("true")])
            .row(vec![Value::from("FALSE")])
            .build()
            .unwrap();
        let text = encode(&table, "r", &EncodeParams::default()).unwrap();
        assert!(text.contains("@ATTRIBUTE flag {'FALSE','true'}"));
        assert!(text.ends_with("'true'\n'FALSE'\n"));
    }

    #[test]
    fn upper_case_boolean_attribute_survives_reencoding() {
        let source = "@relation flags\n\
            @attribute id numeric\n\
            @attribute flag {TRUE,FALSE}\n\
            @data\n\
            1,TRUE\n\
            2,FALSE\n";
        let first = decode_str(source, &DecodeParams::default()).unwrap().table;
        let second = roundtrip(&first);
        assert_eq!(second, first);
        assert_eq!(second.row(0).unwrap()[1], Value::from("TRUE"));
    }

    #[test]
    fn empty_table_encodes_header_only() {
        let table = Table::empty(vec!["a".to_string()]).unwrap();
        let text = encode(&table, "r", &EncodeParams::default()).unwrap();
        assert!(text.ends_with("@DATA\n"));
    }

    #[test]
    fn zero_columns_is_an_error() {
        let table = Table::empty(Vec::new()).unwrap();
        let err = encode(&table, "r", &EncodeParams::default()).unwrap_err();
        assert!(matches!(err, ArffError::Encoding { .. }));
    }

    #[test]
    fn non_finite_number_is_an_error() {
        let table = TableBuilder::new(["x"])
            .row(vec![Value::from(f64::NAN)])
            .build()
            .unwrap();
        let err = encode(&table, "r", &EncodeParams::default()).unwrap_err();
        assert!(matches!(err, ArffError::Encoding { row: Some(0), .. }));
    }

    #[test]
    fn explicit_attributes_reject_undeclared_value() {
        let table = TableBuilder::new(["c"])
            .row(vec![Value::from("a")])
            .row(vec![Value::from("z")])
            .build()
            .unwrap();
        let attrs = [Attribute::nominal("c", ["a", "b"])];
        let err = encode_with_attributes(&table, "r", &attrs).unwrap_err();
        assert!(matches!(err, ArffError::Encoding { row: Some(1), .. }));
    }

    #[test]
    fn explicit_attributes_reject_text_in_numeric() {
        let table = TableBuilder::new(["n"])
            .row(vec![Value::from("seven")])
            .build()
            .unwrap();
        let err = encode_with_attributes(&table, "r", &[Attribute::numeric("n")]).unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn explicit_attributes_count_mismatch() {
        let table = TableBuilder::new(["a", "b"]).build().unwrap();
        let err = encode_with_attributes(&table, "r", &[Attribute::numeric("a")]).unwrap_err();
        assert!(err.to_string().contains("1 attributes declared for 2 columns"));
    }
}
