//! One-shot entry points.
//!
//! Each function starts a fresh [`Assertion`] without secrets and applies a
//! single builder, so simple checks read as one call:
//!
//! ```
//! use expectcookies::assertion::{expect, exchange::Exchange, expected::ExpectedCookie};
//!
//! let exchange = Exchange::from_raw(Some("control=placebo"), ["substance=active"])?;
//! expect::new(ExpectedCookie::named("substance")).check(&exchange)?;
//! # Ok::<(), expectcookies::AssertError>(())
//! ```

use crate::assertion::builder::{Assertion, Method};
use crate::assertion::expected::Expects;
use crate::base::asserterror::AssertResult;
use crate::cookies::collection::CookieCollection;
use crate::cookies::parsedcookie::{self, CookieRecord};

pub fn set(expects: impl Into<Expects>) -> Assertion {
    Assertion::default().set(expects)
}

pub fn reset(expects: impl Into<Expects>) -> Assertion {
    Assertion::default().reset(expects)
}

pub fn new(expects: impl Into<Expects>) -> Assertion {
    Assertion::default().new(expects)
}

pub fn renew(expects: impl Into<Expects>) -> AssertResult<Assertion> {
    Assertion::default().renew(expects)
}

pub fn contain(expects: impl Into<Expects>) -> Assertion {
    Assertion::default().contain(expects)
}

pub fn not(method: Method, expects: impl Into<Expects>) -> AssertResult<Assertion> {
    Assertion::default().not(method, expects)
}

/// Parse a single cookie fragment.
pub fn parse(raw: &str) -> CookieRecord {
    parsedcookie::parse(raw)
}

/// First cookie named `name` in `collection`.
pub fn find<'a>(name: &str, collection: &'a CookieCollection) -> Option<&'a CookieRecord> {
    collection.find(name)
}
