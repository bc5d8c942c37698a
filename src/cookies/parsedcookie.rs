//! `Cookie` / `Set-Cookie` fragment parsing.
//!
//! A fragment is split on `;` into parts. The first part carries the cookie
//! name and value, every later part is an attribute. Parts without `=` are
//! flags (`Secure`, `HttpOnly`). Attribute keys are lower-cased, values are
//! unquoted and percent-decoded.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

use crate::cookies::expiry;

/// Characters escaped when writing a cookie value back out.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'\\');

/// Attribute values keep spaces and commas (dates), only the delimiters go.
const ATTRIBUTE_VALUE: &AsciiSet = &CONTROLS.add(b'%').add(b';');

/// Value of a parsed cookie attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `key=value` attribute, value decoded.
    Text(String),
    /// Flag-only attribute such as `Secure`.
    Flag,
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Flag => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, AttributeValue::Flag)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Flag => f.write_str("true"),
        }
    }
}

/// One parsed cookie: name, value and attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub options: BTreeMap<String, AttributeValue>,
}

impl CookieRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add an attribute, keeping the first assignment of a key.
    pub fn with_option(mut self, key: &str, value: AttributeValue) -> Self {
        self.options
            .entry(key.trim().to_lowercase())
            .or_insert(value);
        self
    }

    /// Look up an attribute by (case-insensitive) key.
    pub fn option(&self, key: &str) -> Option<&AttributeValue> {
        self.options.get(&key.to_lowercase())
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }

    pub fn domain(&self) -> Option<&str> {
        self.option("domain").and_then(AttributeValue::as_str)
    }

    pub fn path(&self) -> Option<&str> {
        self.option("path").and_then(AttributeValue::as_str)
    }

    pub fn secure(&self) -> bool {
        self.has_option("secure")
    }

    pub fn http_only(&self) -> bool {
        self.has_option("httponly")
    }

    /// `Max-Age` coerced to an integer; non-numeric values count as absent.
    pub fn max_age(&self) -> Option<i64> {
        self.option("max-age")
            .and_then(AttributeValue::as_str)
            .and_then(expiry::parse_max_age)
    }

    /// `Expires` coerced to an instant; unparseable dates count as absent.
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.option("expires")
            .and_then(AttributeValue::as_str)
            .and_then(expiry::parse_expires)
    }

    /// True when nothing at all was parsed.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.value.is_empty() && self.options.is_empty()
    }
}

impl fmt::Display for CookieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            self.name,
            utf8_percent_encode(&self.value, COOKIE_VALUE)
        )?;
        for (key, value) in &self.options {
            match value {
                AttributeValue::Flag => write!(f, "; {key}")?,
                AttributeValue::Text(v) => {
                    write!(f, "; {key}={}", utf8_percent_encode(v, ATTRIBUTE_VALUE))?
                }
            }
        }
        Ok(())
    }
}

/// Value decoder used by the parser.
pub type Decoder = fn(&str) -> Option<String>;

/// Parser configuration.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Returns `None` when a value cannot be decoded; the raw value is kept.
    pub decode: Decoder,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            decode: decode_uri_component,
        }
    }
}

impl ParseOptions {
    /// Keep every value exactly as it appears in the header.
    pub fn raw() -> Self {
        Self {
            decode: |s| Some(s.to_string()),
        }
    }

    pub fn with_decoder(mut self, decode: Decoder) -> Self {
        self.decode = decode;
        self
    }
}

/// Strict percent-decoding: every `%` must start a two digit hex escape and
/// the decoded bytes must be UTF-8, otherwise `None`.
pub fn decode_uri_component(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Parse a cookie fragment with the default decoder.
///
/// ```
/// use expectcookies::cookies::parsedcookie::{parse, AttributeValue};
///
/// let cookie = parse("substance=active; Domain=domain.com; Path=/; HttpOnly");
/// assert_eq!(cookie.name, "substance");
/// assert_eq!(cookie.value, "active");
/// assert_eq!(cookie.domain(), Some("domain.com"));
/// assert_eq!(cookie.option("httponly"), Some(&AttributeValue::Flag));
/// ```
pub fn parse(raw: &str) -> CookieRecord {
    parse_with(raw, &ParseOptions::default())
}

/// Parse a cookie fragment. Never fails: undecodable values are kept raw and
/// empty input yields an empty record.
pub fn parse_with(raw: &str, options: &ParseOptions) -> CookieRecord {
    let mut cookie = CookieRecord::default();

    for (index, part) in raw.split(';').map(str::trim).enumerate() {
        if part.is_empty() {
            continue;
        }

        let Some((key, value)) = part.split_once('=') else {
            cookie
                .options
                .entry(part.to_lowercase())
                .or_insert(AttributeValue::Flag);
            continue;
        };

        let value = decode_value(unquote(value.trim()), options);

        if index == 0 {
            cookie.name = key.trim().to_string();
            cookie.value = value;
        } else {
            cookie
                .options
                .entry(key.trim().to_lowercase())
                .or_insert(AttributeValue::Text(value));
        }
    }

    cookie
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn decode_value(value: &str, options: &ParseOptions) -> String {
    match (options.decode)(value) {
        Some(decoded) => decoded,
        None => {
            tracing::trace!(value = %value, "cookie value not decodable, keeping raw value");
            value.to_string()
        }
    }
}
