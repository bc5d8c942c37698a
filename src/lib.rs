//! # expectcookies
//!
//! Assertions over the cookies of an HTTP request/response pair.
//!
//! `expectcookies` parses the request `Cookie` header and the response
//! `Set-Cookie` headers, then checks them against expected cookie
//! descriptors: whether a cookie was set, reset, newly issued, renewed or
//! carries a given value and attributes. Signed values in the `s:` format
//! are verified against candidate secrets.
//!
//! ## Quick Start
//!
//! ```rust
//! use expectcookies::{Assertion, Exchange, ExpectedCookie, Method};
//!
//! let exchange = Exchange::from_raw(
//!     Some("control=placebo"),
//!     ["substance=active; Domain=domain.com; Path=/; HttpOnly"],
//! )?;
//!
//! Assertion::with_secret(["one", "two"])
//!     .set(ExpectedCookie::named("substance").options(["domain", "path", "httponly"]))
//!     .contain(ExpectedCookie::named("substance").value("active").domain("domain.com"))
//!     .not(Method::New, ExpectedCookie::named("control"))?
//!     .check(&exchange)?;
//! # Ok::<(), expectcookies::AssertError>(())
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie parsing, collections, expiry coercion and signatures
//! - [`assertion`] - Expected cookies, predicates and the assertion builder

pub mod assertion;
pub mod base;
pub mod cookies;

pub use assertion::builder::{Assertion, Method, Secrets};
pub use assertion::exchange::{CookieExchange, Exchange};
pub use assertion::expected::{ExpectedCookie, ExpectedValue, Expects};
pub use base::asserterror::{AssertError, AssertResult};
pub use cookies::collection::{find, CookieCollection};
pub use cookies::parsedcookie::{parse, CookieRecord};
