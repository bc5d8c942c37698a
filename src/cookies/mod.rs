//! Cookie parsing and value handling.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`parsedcookie`] | Single `Cookie` / `Set-Cookie` fragment parsing |
//! | [`collection`] | Ordered cookie lists built from whole headers |
//! | [`expiry`] | `Expires` and `Max-Age` coercion |
//! | [`signature`] | `s:`-prefixed HMAC-SHA256 signed values |

pub mod collection;
pub mod expiry;
pub mod parsedcookie;
pub mod signature;
