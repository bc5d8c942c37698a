//! Expected cookie descriptors.
//!
//! An [`ExpectedCookie`] names a cookie and optionally its value, the
//! attributes it should carry and candidate signing secrets. Each attribute
//! maps to an optional [`ExpectedValue`]; `None` only checks presence.

use std::collections::BTreeMap;
use std::fmt;
use time::OffsetDateTime;

use crate::cookies::expiry;

/// Expected value of a cookie attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedValue {
    /// Exact text. `expires` and `max-age` are compared after coercion.
    Text(String),
    /// Integer, compared against the integer-coerced attribute.
    Number(i64),
    /// `true`: the attribute is present. `false`: the attribute is absent.
    Flag(bool),
    /// Instant, compared against the coerced `expires` attribute.
    Date(OffsetDateTime),
}

impl fmt::Display for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedValue::Text(s) => write!(f, "'{s}'"),
            ExpectedValue::Number(n) => write!(f, "{n}"),
            ExpectedValue::Flag(b) => write!(f, "{b}"),
            ExpectedValue::Date(d) => write!(f, "'{}'", expiry::format_http_date(*d)),
        }
    }
}

impl From<&str> for ExpectedValue {
    fn from(value: &str) -> Self {
        ExpectedValue::Text(value.to_string())
    }
}

impl From<String> for ExpectedValue {
    fn from(value: String) -> Self {
        ExpectedValue::Text(value)
    }
}

impl From<i64> for ExpectedValue {
    fn from(value: i64) -> Self {
        ExpectedValue::Number(value)
    }
}

impl From<bool> for ExpectedValue {
    fn from(value: bool) -> Self {
        ExpectedValue::Flag(value)
    }
}

impl From<OffsetDateTime> for ExpectedValue {
    fn from(value: OffsetDateTime) -> Self {
        ExpectedValue::Date(value)
    }
}

/// Description of a cookie a test expects to observe.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(try_from = "json::RawExpectedCookie"))]
pub struct ExpectedCookie {
    pub name: String,
    pub value: Option<String>,
    /// Lower-cased attribute key to optional expected value.
    pub options: BTreeMap<String, Option<ExpectedValue>>,
    /// Candidate secrets for signed values, tried in order.
    pub secret: Vec<String>,
}

impl ExpectedCookie {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            options: BTreeMap::new(),
            secret: Vec::new(),
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Expect attribute `key` to equal `value`.
    pub fn option(mut self, key: &str, value: impl Into<ExpectedValue>) -> Self {
        self.options.insert(key.to_lowercase(), Some(value.into()));
        self
    }

    /// Expect attribute `key` to be present, whatever its value.
    pub fn present(mut self, key: &str) -> Self {
        self.options.insert(key.to_lowercase(), None);
        self
    }

    /// Expect every attribute in `keys` to be present.
    pub fn options<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.options.insert(key.as_ref().to_lowercase(), None);
        }
        self
    }

    /// Expect attribute `key` to be absent.
    pub fn absent(self, key: &str) -> Self {
        self.option(key, false)
    }

    pub fn domain(self, domain: &str) -> Self {
        self.option("domain", domain)
    }

    pub fn path(self, path: &str) -> Self {
        self.option("path", path)
    }

    pub fn max_age(self, seconds: i64) -> Self {
        self.option("max-age", seconds)
    }

    pub fn expires(self, at: OffsetDateTime) -> Self {
        self.option("expires", at)
    }

    pub fn secure(self) -> Self {
        self.option("secure", true)
    }

    pub fn http_only(self) -> Self {
        self.option("httponly", true)
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret.push(secret.into());
        self
    }

    pub fn expected(&self, key: &str) -> Option<&ExpectedValue> {
        self.options.get(key).and_then(Option::as_ref)
    }
}

/// One descriptor or many, normalised with [`Expects::into_vec`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum Expects {
    Single(ExpectedCookie),
    Many(Vec<ExpectedCookie>),
}

impl Expects {
    pub fn into_vec(self) -> Vec<ExpectedCookie> {
        match self {
            Expects::Single(expect) => vec![expect],
            Expects::Many(expects) => expects,
        }
    }

    /// Parse a JSON descriptor (object) or descriptor list (array).
    ///
    /// ```
    /// use expectcookies::assertion::expected::Expects;
    ///
    /// let expects = Expects::from_json(
    ///     r#"{"name": "substance", "options": ["domain", "path", "httponly"]}"#,
    /// )?;
    /// assert_eq!(expects.into_vec()[0].options.len(), 3);
    /// # Ok::<(), expectcookies::AssertError>(())
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> crate::base::asserterror::AssertResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::base::asserterror::AssertError::construction(format!(
                "invalid cookie expectation: {e}"
            ))
        })
    }
}

impl From<ExpectedCookie> for Expects {
    fn from(expect: ExpectedCookie) -> Self {
        Expects::Single(expect)
    }
}

impl From<Vec<ExpectedCookie>> for Expects {
    fn from(expects: Vec<ExpectedCookie>) -> Self {
        Expects::Many(expects)
    }
}

impl<const N: usize> From<[ExpectedCookie; N]> for Expects {
    fn from(expects: [ExpectedCookie; N]) -> Self {
        Expects::Many(expects.into())
    }
}

#[cfg(feature = "json")]
mod json {
    //! Descriptor shapes accepted from JSON fixtures.

    use super::{ExpectedCookie, ExpectedValue};
    use serde::Deserialize;
    use serde_json::{Map, Value};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    impl OneOrMany {
        fn into_vec(self) -> Vec<String> {
            match self {
                OneOrMany::One(s) => vec![s],
                OneOrMany::Many(v) => v,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum RawOptions {
        Keys(Vec<String>),
        Values(Map<String, Value>),
    }

    #[derive(Deserialize)]
    pub(super) struct RawExpectedCookie {
        name: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        options: Option<RawOptions>,
        #[serde(default)]
        secret: Option<OneOrMany>,
    }

    impl TryFrom<RawExpectedCookie> for ExpectedCookie {
        type Error = String;

        fn try_from(raw: RawExpectedCookie) -> Result<Self, Self::Error> {
            let mut expect = ExpectedCookie::named(raw.name);
            expect.value = raw.value;
            if let Some(secret) = raw.secret {
                expect.secret.extend(secret.into_vec());
            }

            match raw.options {
                None => {}
                Some(RawOptions::Keys(keys)) => expect = expect.options(keys),
                Some(RawOptions::Values(map)) => {
                    for (key, value) in map {
                        let key = key.to_lowercase();
                        if key == "secret" {
                            let secret = OneOrMany::deserialize(value)
                                .map_err(|e| format!("option 'secret': {e}"))?;
                            expect.secret.extend(secret.into_vec());
                            continue;
                        }
                        let value = expected_value(&key, value)?;
                        expect.options.insert(key, value);
                    }
                }
            }

            Ok(expect)
        }
    }

    fn expected_value(key: &str, value: Value) -> Result<Option<ExpectedValue>, String> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(ExpectedValue::Flag(b))),
            Value::String(s) => Ok(Some(ExpectedValue::Text(s))),
            Value::Number(n) => n
                .as_i64()
                .map(|n| Some(ExpectedValue::Number(n)))
                .ok_or_else(|| format!("option '{key}': {n} is not an integer")),
            other => Err(format!("option '{key}': unsupported value {other}")),
        }
    }
}
