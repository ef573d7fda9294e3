//! Lexing, quoting and sanitization of ARFF tokens.
//!
//! # Quoting
//!
//! Values may be bare or wrapped in `'` or `"`. Inside quotes a backslash
//! escapes the next character (`\n`, `\r`, `\t` map to control characters).
//!
//! # Sanitization (lossy)
//!
//! Before a text value is written it is sanitized so that one record stays
//! on one line and the comma grammar holds even for readers that ignore
//! quoting:
//!
//! | input            | output |
//! |------------------|--------|
//! | `\r`, `\n`, `\t` | space  |
//! | `,`              | `;`    |
//!
//! Quotes and backslashes are escaped rather than replaced, so they survive
//! a round-trip.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

/// A lexed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Unescaped text (quotes removed, surrounding whitespace trimmed if bare).
    pub text: String,
    /// Whether the value was written in quotes.
    pub quoted: bool,
}

impl Token {
    /// True for the bare missing-value marker `?` and for empty values.
    pub fn is_missing(&self) -> bool {
        self.text.is_empty() || (!self.quoted && self.text == "?")
    }
}

/// Character cursor over a single line.
pub struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    pub fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    pub fn next_char(&mut self) -> Option<char> {
        self.chars.next()
    }

    pub fn is_done(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// The rest of the line, untouched.
    pub fn rest(self) -> String {
        self.chars.collect()
    }

    /// Reads one value: quoted up to its closing quote, or bare up to the
    /// first character matching `stop` (not consumed).
    pub fn read_value(&mut self, stop: impl Fn(char) -> bool) -> Result<Token, String> {
        self.skip_whitespace();
        match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.chars.next();
                self.read_quoted(q)
            }
            _ => {
                let mut text = String::new();
                while let Some(c) = self.peek() {
                    if stop(c) {
                        break;
                    }
                    text.push(c);
                    self.chars.next();
                }
                Ok(Token {
                    text: text.trim_end().to_string(),
                    quoted: false,
                })
            }
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<Token, String> {
        let mut text = String::new();
        loop {
            match self.chars.next() {
                None => return Err(format!("unterminated {quote}-quoted value")),
                Some('\\') => match self.chars.next() {
                    None => return Err("dangling escape at end of line".to_string()),
                    Some('n') => text.push('\n'),
                    Some('r') => text.push('\r'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                },
                Some(c) if c == quote => break,
                Some(c) => text.push(c),
            }
        }
        Ok(Token { text, quoted: true })
    }
}

/// Splits a comma-delimited list of values, honoring quotes.
///
/// An empty input yields no tokens.
pub fn split_values(input: &str) -> Result<Vec<Token>, String> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    if cursor.is_done() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    loop {
        tokens.push(cursor.read_value(|c| c == ',')?);
        cursor.skip_whitespace();
        match cursor.next_char() {
            None => break,
            Some(',') => {}
            Some(other) => return Err(format!("unexpected '{other}' after quoted value")),
        }
    }
    Ok(tokens)
}

/// Replaces characters that break the one-record-per-line, comma-delimited
/// grammar. Lossy; see the module docs.
pub fn sanitize(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n', '\t', ',']) {
        Cow::Owned(
            value
                .chars()
                .map(|c| match c {
                    '\r' | '\n' | '\t' => ' ',
                    ',' => ';',
                    other => other,
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(value)
    }
}

/// Sanitizes and single-quotes a value, escaping `'` and `\`.
pub fn quote(value: &str) -> String {
    let clean = sanitize(value);
    let mut out = String::with_capacity(clean.len() + 2);
    out.push('\'');
    for c in clean.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Renders a relation or attribute name, quoting only when needed.
pub fn quote_name(name: &str) -> String {
    let bare_ok = !name.is_empty()
        && !name.starts_with(['%', '@', '{'])
        && name
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, ',' | '\'' | '"' | '\\' | '{' | '}'));
    if bare_ok {
        name.to_string()
    } else {
        quote(name)
    }
}
