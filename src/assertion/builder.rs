//! Composable cookie assertions.
//!
//! An [`Assertion`] holds candidate signing secrets and an ordered list of
//! predicates. Builder methods append one predicate per expected cookie and
//! return the assertion for chaining; [`Assertion::check`] parses a request
//! and response pair and evaluates the predicates in order, stopping at the
//! first failure.
//!
//! ```
//! use expectcookies::assertion::builder::{Assertion, Method};
//! use expectcookies::assertion::exchange::Exchange;
//! use expectcookies::assertion::expected::ExpectedCookie;
//!
//! let exchange = Exchange::from_raw(
//!     Some("control=placebo"),
//!     ["substance=active; Domain=domain.com; Path=/; HttpOnly"],
//! )?;
//!
//! let assertion = Assertion::default()
//!     .set(ExpectedCookie::named("substance").options(["domain", "path", "httponly"]))
//!     .new(ExpectedCookie::named("substance"))
//!     .not(Method::Set, ExpectedCookie::named("control"))?;
//!
//! assertion.check(&exchange)?;
//! # Ok::<(), expectcookies::AssertError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::assertion::exchange::{CookieExchange, RequestContext, ResponseContext};
use crate::assertion::expected::{ExpectedCookie, Expects};
use crate::assertion::predicate::{self, Predicate};
use crate::base::asserterror::{AssertError, AssertResult};
use crate::cookies::parsedcookie::ParseOptions;
use crate::cookies::signature::{HmacSha256Signer, Unsigner};

/// Candidate secrets for signed cookie values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets(Vec<String>);

impl Secrets {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Secrets {
    fn from(secret: &str) -> Self {
        Secrets(vec![secret.to_string()])
    }
}

impl From<String> for Secrets {
    fn from(secret: String) -> Self {
        Secrets(vec![secret])
    }
}

impl From<Vec<String>> for Secrets {
    fn from(secrets: Vec<String>) -> Self {
        Secrets(secrets)
    }
}

impl From<Vec<&str>> for Secrets {
    fn from(secrets: Vec<&str>) -> Self {
        Secrets(secrets.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Secrets {
    fn from(secrets: &[&str]) -> Self {
        Secrets(secrets.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Secrets {
    fn from(secrets: [&str; N]) -> Self {
        Secrets(secrets.iter().map(|s| s.to_string()).collect())
    }
}

impl<T: Into<Secrets>> From<Option<T>> for Secrets {
    fn from(secrets: Option<T>) -> Self {
        secrets.map(Into::into).unwrap_or_default()
    }
}

/// Builder names usable with [`Assertion::not`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Set,
    Reset,
    New,
    Renew,
    Contain,
}

type Builder = fn(Assertion, Vec<ExpectedCookie>, bool) -> AssertResult<Assertion>;

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Set,
        Method::Reset,
        Method::New,
        Method::Renew,
        Method::Contain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Set => "set",
            Method::Reset => "reset",
            Method::New => "new",
            Method::Renew => "renew",
            Method::Contain => "contain",
        }
    }

    fn builder(self) -> Builder {
        match self {
            Method::Set => |a, e, assert| Ok(a.push_set(e, assert)),
            Method::Reset => |a, e, assert| Ok(a.push_reset(e, assert)),
            Method::New => |a, e, assert| Ok(a.push_new(e, assert)),
            Method::Renew => Assertion::push_renew,
            Method::Contain => |a, e, assert| Ok(a.push_contain(e, assert)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                AssertError::invalid_argument(format!("unknown cookie assertion method '{s}'"))
            })
    }
}

/// Secrets plus an ordered list of predicates, evaluated fail-fast.
///
/// Configure secrets, the unsigner and parse options before registering
/// `contain` expectations; predicates capture them when built.
#[derive(Clone)]
pub struct Assertion {
    secrets: Secrets,
    predicates: Vec<Predicate>,
    unsigner: Arc<dyn Unsigner>,
    parse_options: ParseOptions,
}

impl Default for Assertion {
    fn default() -> Self {
        Self::build(Secrets::none(), Vec::new())
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("secrets", &self.secrets.0.len())
            .field("predicates", &self.predicates.len())
            .field("parse_options", &self.parse_options)
            .finish()
    }
}

impl Assertion {
    /// Create an assertion from secrets and pre-built predicates.
    pub fn build<S, P>(secret: S, predicates: P) -> Self
    where
        S: Into<Secrets>,
        P: IntoIterator<Item = Predicate>,
    {
        Self {
            secrets: secret.into(),
            predicates: predicates.into_iter().collect(),
            unsigner: Arc::new(HmacSha256Signer),
            parse_options: ParseOptions::default(),
        }
    }

    pub fn with_secret(secret: impl Into<Secrets>) -> Self {
        Self::build(secret, Vec::new())
    }

    /// Replace the signature verification primitive.
    pub fn with_unsigner(mut self, unsigner: impl Unsigner + 'static) -> Self {
        self.unsigner = Arc::new(unsigner);
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Register a custom predicate after the existing ones.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn secrets(&self) -> &[String] {
        self.secrets.as_slice()
    }

    /// Number of registered predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Parse the exchange and run every predicate in registration order.
    /// Returns the first failure unchanged.
    pub fn check<E>(&self, exchange: &E) -> AssertResult
    where
        E: CookieExchange + ?Sized,
    {
        let req = RequestContext::from_headers(exchange.request_headers(), &self.parse_options)?;
        let res = ResponseContext::from_headers(exchange.response_headers(), &self.parse_options)?;

        tracing::debug!(
            predicates = self.predicates.len(),
            request_cookies = req.cookies.len(),
            response_cookies = res.cookies.len(),
            "evaluating cookie assertion"
        );

        for (index, predicate) in self.predicates.iter().enumerate() {
            if let Err(e) = (**predicate)(&req, &res) {
                tracing::debug!(index, error = %e, "cookie predicate failed");
                return Err(e);
            }
        }

        Ok(())
    }

    /// Expect each cookie to be set with the listed options.
    pub fn set(self, expects: impl Into<Expects>) -> Self {
        self.push_set(expects.into().into_vec(), true)
    }

    /// Expect each cookie to be sent with the request and set again.
    pub fn reset(self, expects: impl Into<Expects>) -> Self {
        self.push_reset(expects.into().into_vec(), true)
    }

    /// Expect each cookie to be set without having been sent.
    pub fn new(self, expects: impl Into<Expects>) -> Self {
        self.push_new(expects.into().into_vec(), true)
    }

    /// Expect each cookie's `expires` or `max-age` to exceed the expected one.
    pub fn renew(self, expects: impl Into<Expects>) -> AssertResult<Self> {
        self.push_renew(expects.into().into_vec(), true)
    }

    /// Expect each cookie to carry the expected value and options.
    pub fn contain(self, expects: impl Into<Expects>) -> Self {
        self.push_contain(expects.into().into_vec(), true)
    }

    /// Register the inverse of `method` for each expected cookie.
    pub fn not(self, method: Method, expects: impl Into<Expects>) -> AssertResult<Self> {
        (method.builder())(self, expects.into().into_vec(), false)
    }

    fn push_set(mut self, expects: Vec<ExpectedCookie>, assert: bool) -> Self {
        self.predicates
            .extend(expects.into_iter().map(|e| predicate::set(e, assert)));
        self
    }

    fn push_reset(mut self, expects: Vec<ExpectedCookie>, assert: bool) -> Self {
        self.predicates
            .extend(expects.into_iter().map(|e| predicate::reset(e, assert)));
        self
    }

    fn push_new(mut self, expects: Vec<ExpectedCookie>, assert: bool) -> Self {
        self.predicates
            .extend(expects.into_iter().map(|e| predicate::new(e, assert)));
        self
    }

    fn push_renew(mut self, expects: Vec<ExpectedCookie>, assert: bool) -> AssertResult<Self> {
        for expect in expects {
            let predicate = predicate::renew(expect, assert)?;
            self.predicates.push(predicate);
        }
        Ok(self)
    }

    fn push_contain(mut self, expects: Vec<ExpectedCookie>, assert: bool) -> Self {
        for expect in expects {
            let predicate = predicate::contain(
                expect,
                assert,
                self.secrets.0.clone(),
                Arc::clone(&self.unsigner),
            );
            self.predicates.push(predicate);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::exchange::Exchange;
    use crate::assertion::predicate::predicate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, result: AssertResult) -> Predicate {
        let counter = Arc::clone(counter);
        predicate(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            result.clone()
        })
    }

    #[test]
    fn test_secrets_normalisation() {
        assert_eq!(Secrets::from("one").as_slice(), ["one"]);
        assert_eq!(Secrets::from(["one", "two"]).as_slice(), ["one", "two"]);
        assert!(Secrets::from(None::<&str>).is_empty());
        assert_eq!(Secrets::from(Some(vec!["a", "b"])).as_slice().len(), 2);
    }

    #[test]
    fn test_method_from_str() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
        assert!(matches!(
            "expire".parse::<Method>(),
            Err(AssertError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_runs_every_predicate_once() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let assertion = Assertion::build(
            Secrets::none(),
            vec![counting(&a, Ok(())), counting(&b, Ok(()))],
        );

        let exchange = Exchange::from_raw(Some("control=placebo"), []).unwrap();
        assertion.check(&exchange).unwrap();

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stops_at_first_failure() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let failure = AssertError::expectation("x", "boom");
        let assertion = Assertion::default()
            .with_predicate(counting(&first, Err(failure.clone())))
            .with_predicate(counting(&second, Ok(())));

        let err = assertion.check(&Exchange::default()).unwrap_err();

        assert_eq!(err, failure);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_one_predicate_per_descriptor() {
        let assertion = Assertion::default()
            .set([ExpectedCookie::named("a"), ExpectedCookie::named("b")])
            .reset(ExpectedCookie::named("c"));
        assert_eq!(assertion.len(), 3);
    }

    #[test]
    fn test_not_renew_construction_error_is_not_inverted() {
        let err = Assertion::default()
            .not(Method::Renew, ExpectedCookie::named("a"))
            .unwrap_err();
        assert!(matches!(err, AssertError::ConstructionError(_)));
    }

    #[test]
    fn test_assertion_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Assertion>();
    }
}
