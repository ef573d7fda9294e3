//! ARFF decoding.
//!
//! # Accepted Layout
//!
//! ```text
//! % comment
//! @RELATION name
//!
//! @ATTRIBUTE a NUMERIC
//! @ATTRIBUTE b {x,y}
//! @ATTRIBUTE c STRING
//!
//! @DATA
//! 1.5,x,'free text'
//! ?,y,?
//! {0 2.0, 2 'sparse row'}
//! ```
//!
//! Keywords are case-insensitive. Comment and blank lines are skipped in
//! both sections.

use divider_types::{Table, Value};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attribute::{Attribute, AttributeType};
use crate::error::{ArffResult, FormatError};
use crate::params::{DecodeParams, MalformedRowPolicy};
use crate::token::{split_values, Cursor, Token};

/// A data record dropped under [`MalformedRowPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRow {
    /// 1-based line number in the input.
    pub line: usize,
    /// Why the record was rejected.
    pub reason: String,
}

/// A decoded ARFF document.
#[derive(Debug, Clone, PartialEq)]
pub struct ArffDocument {
    /// The `@RELATION` name.
    pub relation: String,
    /// Declared attributes, in column order.
    pub attributes: Vec<Attribute>,
    /// The data, one column per attribute.
    pub table: Table,
    /// Records dropped while decoding (always empty under `Reject`).
    pub malformed_rows: Vec<MalformedRow>,
}

impl ArffDocument {
    /// Returns true if any record was dropped.
    #[must_use]
    pub fn has_malformed_rows(&self) -> bool {
        !self.malformed_rows.is_empty()
    }
}

/// Decodes ARFF bytes, replacing invalid UTF-8 with U+FFFD.
///
/// # Errors
///
/// See [`decode_str`].
pub fn decode_bytes(bytes: &[u8], params: &DecodeParams) -> ArffResult<ArffDocument> {
    decode_str(&String::from_utf8_lossy(bytes), params)
}

/// Decodes ARFF text into a table.
///
/// # Errors
///
/// Returns [`FormatError`] (wrapped in [`ArffError`](crate::ArffError)) if:
/// - there is no `@RELATION`, no `@ATTRIBUTE`, or no `@DATA`
/// - the data section holds no records
/// - a header line cannot be parsed
/// - a record is malformed and the policy is [`MalformedRowPolicy::Reject`]
///
/// # Example
///
/// ```
/// use divider_arff::{decode_str, DecodeParams};
///
/// let text = "@relation r\n@attribute x numeric\n@attribute y {a,b}\n@data\n1,a\n2,b\n";
/// let doc = decode_str(text, &DecodeParams::default()).unwrap();
/// assert_eq!(doc.relation, "r");
/// assert_eq!(doc.table.row_count(), 2);
/// ```
pub fn decode_str(text: &str, params: &DecodeParams) -> ArffResult<ArffDocument> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut header = Header::default();
    let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    for (line_no, line) in lines.by_ref() {
        let trimmed = line.trim();
        if is_skippable(trimmed) {
            continue;
        }
        if header.parse_line(line_no, trimmed)? == Section::Data {
            break;
        }
    }

    let Some(relation) = header.relation.take() else {
        return Err(FormatError::MissingRelation.into());
    };
    if header.attributes.is_empty() {
        return Err(FormatError::NoAttributes.into());
    }
    if !header.saw_data {
        return Err(FormatError::MissingData.into());
    }

    let attributes = header.attributes;
    let mut rows = Vec::new();
    let mut malformed_rows = Vec::new();

    for (line_no, line) in lines {
        let trimmed = line.trim();
        if is_skippable(trimmed) {
            continue;
        }
        match parse_record(trimmed, &attributes) {
            Ok(row) => rows.push(row),
            Err(reason) => match params.malformed_rows {
                MalformedRowPolicy::Reject => {
                    return Err(FormatError::malformed(line_no, reason).into());
                }
                MalformedRowPolicy::Skip => {
                    warn!(line = line_no, %reason, "skipping malformed ARFF record");
                    malformed_rows.push(MalformedRow {
                        line: line_no,
                        reason,
                    });
                }
            },
        }
    }

    if rows.is_empty() {
        return Err(FormatError::EmptyData.into());
    }

    let columns = attributes.iter().map(|a| a.name.clone()).collect();
    // Names are unique and rows are built at attribute width.
    let table = Table::new(columns, rows)
        .map_err(|e| FormatError::syntax(0, format!("inconsistent table: {e}")))?;

    debug!(
        relation = %relation,
        attributes = attributes.len(),
        rows = table.row_count(),
        skipped = malformed_rows.len(),
        "decoded ARFF document"
    );

    Ok(ArffDocument {
        relation,
        attributes,
        table,
        malformed_rows,
    })
}

fn is_skippable(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('%')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Data,
}

#[derive(Debug, Default)]
struct Header {
    relation: Option<String>,
    attributes: Vec<Attribute>,
    names: HashSet<String>,
    saw_data: bool,
}

impl Header {
    fn parse_line(&mut self, line: usize, trimmed: &str) -> Result<Section, FormatError> {
        let Some(directive) = trimmed.strip_prefix('@') else {
            return Err(FormatError::syntax(
                line,
                "expected @RELATION, @ATTRIBUTE or @DATA",
            ));
        };

        let keyword_len = directive
            .find(char::is_whitespace)
            .unwrap_or(directive.len());
        let (keyword, rest) = directive.split_at(keyword_len);

        match keyword.to_ascii_lowercase().as_str() {
            "relation" => {
                if self.relation.is_some() {
                    return Err(FormatError::syntax(line, "duplicate @RELATION"));
                }
                let name = Cursor::new(rest)
                    .read_value(char::is_whitespace)
                    .map_err(|m| FormatError::syntax(line, m))?;
                if name.text.is_empty() {
                    return Err(FormatError::syntax(line, "@RELATION without a name"));
                }
                self.relation = Some(name.text);
                Ok(Section::Header)
            }
            "attribute" => {
                let attribute = parse_attribute(line, rest)?;
                if !self.names.insert(attribute.name.clone()) {
                    return Err(FormatError::syntax(
                        line,
                        format!("duplicate attribute '{}'", attribute.name),
                    ));
                }
                self.attributes.push(attribute);
                Ok(Section::Header)
            }
            "data" => {
                self.saw_data = true;
                Ok(Section::Data)
            }
            "end" => Err(FormatError::UnsupportedAttribute {
                line,
                kind: "relational".to_string(),
            }),
            other => Err(FormatError::syntax(line, format!("unknown directive @{other}"))),
        }
    }
}

fn parse_attribute(line: usize, rest: &str) -> Result<Attribute, FormatError> {
    let mut cursor = Cursor::new(rest);
    let name = cursor
        .read_value(|c| c.is_whitespace() || c == '{')
        .map_err(|m| FormatError::syntax(line, m))?;
    if name.text.is_empty() {
        return Err(FormatError::syntax(line, "@ATTRIBUTE without a name"));
    }

    let decl = cursor.rest();
    let decl = decl.trim();
    if decl.is_empty() {
        return Err(FormatError::syntax(
            line,
            format!("attribute '{}' has no type", name.text),
        ));
    }

    let kind = if let Some(inner) = decl.strip_prefix('{') {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| FormatError::syntax(line, "unterminated nominal set"))?;
        let labels: Vec<String> = split_values(inner)
            .map_err(|m| FormatError::syntax(line, m))?
            .into_iter()
            .map(|t| t.text)
            .collect();
        if labels.is_empty() {
            return Err(FormatError::syntax(line, "empty nominal set"));
        }
        AttributeType::Nominal(labels)
    } else {
        let type_len = decl.find(char::is_whitespace).unwrap_or(decl.len());
        let (type_word, type_rest) = decl.split_at(type_len);
        match type_word.to_ascii_lowercase().as_str() {
            "numeric" | "real" | "integer" => AttributeType::Numeric,
            "string" => AttributeType::String,
            "date" => {
                let format = Cursor::new(type_rest)
                    .read_value(|_| false)
                    .map_err(|m| FormatError::syntax(line, m))?;
                AttributeType::Date(Some(format.text).filter(|f| !f.is_empty()))
            }
            other => {
                return Err(FormatError::UnsupportedAttribute {
                    line,
                    kind: other.to_string(),
                })
            }
        }
    };

    Ok(Attribute::new(name.text, kind))
}

fn parse_record(trimmed: &str, attributes: &[Attribute]) -> Result<Vec<Value>, String> {
    if let Some(inner) = trimmed.strip_prefix('{') {
        let inner = inner
            .strip_suffix('}')
            .ok_or_else(|| "unterminated sparse record".to_string())?;
        return parse_sparse(inner, attributes);
    }

    let tokens = split_values(trimmed)?;
    if tokens.len() != attributes.len() {
        return Err(format!(
            "expected {} values, found {}",
            attributes.len(),
            tokens.len()
        ));
    }

    tokens
        .iter()
        .zip(attributes)
        .map(|(token, attribute)| convert(token, attribute))
        .collect()
}

fn parse_sparse(inner: &str, attributes: &[Attribute]) -> Result<Vec<Value>, String> {
    let mut row: Vec<Value> = attributes.iter().map(sparse_default).collect();
    let mut cursor = Cursor::new(inner);
    cursor.skip_whitespace();

    while !cursor.is_done() {
        let index_token = cursor.read_value(char::is_whitespace)?;
        let index: usize = index_token
            .text
            .parse()
            .map_err(|_| format!("invalid sparse index '{}'", index_token.text))?;
        let attribute = attributes.get(index).ok_or_else(|| {
            format!(
                "sparse index {index} out of range for {} attributes",
                attributes.len()
            )
        })?;

        let token = cursor.read_value(|c| c == ',')?;
        row[index] = convert(&token, attribute)?;

        cursor.skip_whitespace();
        match cursor.next_char() {
            None | Some(',') => cursor.skip_whitespace(),
            Some(other) => return Err(format!("unexpected '{other}' in sparse record")),
        }
    }

    Ok(row)
}

/// Value of an entry omitted from a sparse record.
fn sparse_default(attribute: &Attribute) -> Value {
    match &attribute.kind {
        AttributeType::Numeric => Value::Number(0.0),
        AttributeType::Nominal(labels) => labels.first().cloned().map_or(Value::Null, Value::Text),
        AttributeType::String | AttributeType::Date(_) => Value::Null,
    }
}

fn convert(token: &Token, attribute: &Attribute) -> Result<Value, String> {
    if token.is_missing() {
        return Ok(Value::Null);
    }

    match &attribute.kind {
        AttributeType::Numeric => match token.text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Number(n)),
            _ => Err(format!(
                "'{}' is not a finite number for attribute '{}'",
                token.text, attribute.name
            )),
        },
        AttributeType::Nominal(labels) => {
            if labels.iter().any(|l| *l == token.text) {
                Ok(Value::Text(token.text.clone()))
            } else {
                Err(format!(
                    "'{}' is not a declared value of attribute '{}'",
                    token.text, attribute.name
                ))
            }
        }
        AttributeType::String | AttributeType::Date(_) => Ok(Value::Text(token.text.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ArffError;

    const IRIS_LIKE: &str = "% A small dataset
% with comments

@RELATION iris

@ATTRIBUTE 'sepal length' NUMERIC
@ATTRIBUTE petalwidth REAL
@ATTRIBUTE class {Iris-setosa,Iris-versicolor}

@DATA
5.1,0.2,Iris-setosa
% comment inside data

7.0,?,Iris-versicolor
";

    fn decode(text: &str) -> ArffResult<ArffDocument> {
        decode_str(text, &DecodeParams::default())
    }

    fn format_error(result: ArffResult<ArffDocument>) -> FormatError {
        match result {
            Err(ArffError::Format(err)) => err,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn decode_basic_document() {
        let doc = decode(IRIS_LIKE).unwrap();
        assert_eq!(doc.relation, "iris");
        assert_eq!(doc.attributes.len(), 3);
        assert_eq!(doc.attributes[0].name, "sepal length");
        assert!(doc.attributes[1].kind.is_numeric());
        assert_eq!(
            doc.table.columns(),
            ["sepal length", "petalwidth", "class"]
        );
        assert_eq!(doc.table.row_count(), 2);
        assert_eq!(doc.table.rows()[0][0], Value::Number(5.1));
        assert_eq!(doc.table.rows()[1][1], Value::Null);
        assert_eq!(doc.table.rows()[1][2], Value::from("Iris-versicolor"));
        assert!(!doc.has_malformed_rows());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let text = "@relation r\n@Attribute a integer\n@attribute b string\n@Data\n1,'x y'\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.table.rows()[0][1], Value::from("x y"));
    }

    #[test]
    fn missing_relation() {
        let err = format_error(decode("@attribute a numeric\n@data\n1\n"));
        assert_eq!(err, FormatError::MissingRelation);
    }

    #[test]
    fn missing_data_section() {
        let err = format_error(decode("@relation r\n@attribute a numeric\n"));
        assert_eq!(err, FormatError::MissingData);
    }

    #[test]
    fn no_attributes() {
        let err = format_error(decode("@relation r\n@data\n1\n"));
        assert_eq!(err, FormatError::NoAttributes);
    }

    #[test]
    fn empty_data_section() {
        let err = format_error(decode("@relation r\n@attribute a numeric\n@data\n% nothing\n\n"));
        assert_eq!(err, FormatError::EmptyData);
    }

    #[test]
    fn content_before_data_is_rejected() {
        let err = format_error(decode("@relation r\nhello\n@attribute a numeric\n@data\n1\n"));
        assert!(matches!(err, FormatError::Syntax { line: 2, .. }));
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let err = format_error(decode(
            "@relation r\n@attribute a numeric\n@attribute a string\n@data\n1,x\n",
        ));
        assert!(matches!(err, FormatError::Syntax { line: 3, .. }));
    }

    #[test]
    fn relational_attribute_is_unsupported() {
        let err = format_error(decode(
            "@relation r\n@attribute bag relational\n@end bag\n@data\n1\n",
        ));
        assert!(matches!(err, FormatError::UnsupportedAttribute { line: 2, .. }));
    }

    #[test]
    fn value_count_mismatch_rejected_by_default() {
        let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1,2\n3\n";
        let err = format_error(decode(text));
        assert!(matches!(err, FormatError::MalformedRecord { line: 6, .. }));
    }

    #[test]
    fn value_count_mismatch_skipped_when_lenient() {
        let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1,2\n3\n4,5,6\n7,8\n";
        let doc = decode_str(text, &DecodeParams::lenient()).unwrap();
        assert_eq!(doc.table.row_count(), 2);
        let lines: Vec<usize> = doc.malformed_rows.iter().map(|m| m.line).collect();
        assert_eq!(lines, [6, 7]);
        assert!(doc.malformed_rows[0].reason.contains("expected 2 values"));
    }

    #[test]
    fn all_rows_malformed_is_empty_data() {
        let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1\n2\n";
        let err = format_error(decode_str(text, &DecodeParams::lenient()));
        assert_eq!(err, FormatError::EmptyData);
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let text = "@relation r\n@attribute a numeric\n@data\nabc\n";
        let err = format_error(decode(text));
        assert!(matches!(err, FormatError::MalformedRecord { line: 4, .. }));

        let text = "@relation r\n@attribute a numeric\n@data\nNaN\n";
        assert!(decode(text).is_err());
    }

    #[test]
    fn undeclared_nominal_value_is_malformed() {
        let text = "@relation r\n@attribute a {x,y}\n@data\nx\nz\n";
        let doc = decode_str(text, &DecodeParams::lenient()).unwrap();
        assert_eq!(doc.table.row_count(), 1);
        assert_eq!(doc.malformed_rows[0].line, 5);
    }

    #[test]
    fn missing_and_empty_decode_to_null() {
        let text = "@relation r\n@attribute a string\n@attribute b numeric\n@attribute c string\n@data\n?,?,''\n,1,'?'\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.table.rows()[0], [Value::Null, Value::Null, Value::Null]);
        assert_eq!(
            doc.table.rows()[1],
            [Value::Null, Value::Number(1.0), Value::from("?")]
        );
    }

    #[test]
    fn quoted_nominal_declaration() {
        let text = "@relation 'my data'\n@attribute 'the class' {'a b', \"c,d\"}\n@data\n'c,d'\n'a b'\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.relation, "my data");
        assert_eq!(
            doc.attributes[0].kind,
            AttributeType::Nominal(vec!["a b".to_string(), "c,d".to_string()])
        );
        assert_eq!(doc.table.rows()[0][0], Value::from("c,d"));
    }

    #[test]
    fn nominal_without_space_after_name() {
        let text = "@relation r\n@attribute cls{a,b}\n@data\nb\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.attributes[0].name, "cls");
    }

    #[test]
    fn date_attribute_kept_as_text() {
        let text = "@relation r\n@attribute d date \"yyyy-MM-dd\"\n@data\n'2024-01-31'\n";
        let doc = decode(text).unwrap();
        assert_eq!(
            doc.attributes[0].kind,
            AttributeType::Date(Some("yyyy-MM-dd".to_string()))
        );
        assert_eq!(doc.table.rows()[0][0], Value::from("2024-01-31"));
    }

    #[test]
    fn sparse_records() {
        let text = "@relation r\n@attribute a numeric\n@attribute b {x,y}\n@attribute c string\n@data\n{0 2.5, 2 'hi there'}\n{}\n{1 y}\n";
        let doc = decode(text).unwrap();
        let rows = doc.table.rows();
        assert_eq!(rows[0], [Value::Number(2.5), Value::from("x"), Value::from("hi there")]);
        assert_eq!(rows[1], [Value::Number(0.0), Value::from("x"), Value::Null]);
        assert_eq!(rows[2], [Value::Number(0.0), Value::from("y"), Value::Null]);
    }

    #[test]
    fn sparse_index_out_of_range() {
        let text = "@relation r\n@attribute a numeric\n@data\n{3 1}\n";
        let err = format_error(decode(text));
        assert!(matches!(err, FormatError::MalformedRecord { line: 4, .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut bytes = b"@relation r\n@attribute a string\n@data\n'caf".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"'\n");
        let doc = decode_bytes(&bytes, &DecodeParams::default()).unwrap();
        assert_eq!(doc.table.rows()[0][0], Value::from("caf\u{FFFD}"));
    }

    #[test]
    fn bom_and_crlf_are_tolerated() {
        let text = "\u{feff}@relation r\r\n@attribute a numeric\r\n@data\r\n1\r\n";
        let doc = decode(text).unwrap();
        assert_eq!(doc.table.rows()[0][0], Value::Number(1.0));
    }
}
