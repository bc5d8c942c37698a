//! Ordered cookie collections.

use crate::cookies::parsedcookie::{parse_with, CookieRecord, ParseOptions};

/// Cookies in header order. Lookups return the first record with a name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieCollection {
    cookies: Vec<CookieRecord>,
}

impl CookieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request `Cookie` header: `;`-separated name/value pairs, one
    /// record per pair.
    pub fn from_cookie_header(header: &str, options: &ParseOptions) -> Self {
        let mut collection = Self::new();
        collection.extend_from_cookie_header(header, options);
        collection
    }

    /// Parse response `Set-Cookie` lines, one record per line.
    pub fn from_set_cookie<'a, I>(lines: I, options: &ParseOptions) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut collection = Self::new();
        for line in lines {
            let cookie = parse_with(line, options);
            if !cookie.is_empty() {
                collection.push(cookie);
            }
        }
        collection
    }

    pub(crate) fn extend_from_cookie_header(&mut self, header: &str, options: &ParseOptions) {
        for pair in header.split(';') {
            let cookie = parse_with(pair, options);
            if !cookie.is_empty() {
                self.push(cookie);
            }
        }
    }

    pub fn push(&mut self, cookie: CookieRecord) {
        self.cookies.push(cookie);
    }

    /// First cookie named `name` (case-sensitive).
    pub fn find(&self, name: &str) -> Option<&CookieRecord> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CookieRecord> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl From<Vec<CookieRecord>> for CookieCollection {
    fn from(cookies: Vec<CookieRecord>) -> Self {
        Self { cookies }
    }
}

impl FromIterator<CookieRecord> for CookieCollection {
    fn from_iter<T: IntoIterator<Item = CookieRecord>>(iter: T) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CookieCollection {
    type Item = &'a CookieRecord;
    type IntoIter = std::slice::Iter<'a, CookieRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.iter()
    }
}

/// Find the first cookie named `name` in `collection`.
pub fn find<'a>(name: &str, collection: &'a CookieCollection) -> Option<&'a CookieRecord> {
    collection.find(name)
}
