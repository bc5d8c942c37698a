//! Cookie assertions over a request/response exchange.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`exchange`] | Headers under test and the cookies parsed from them |
//! | [`expected`] | Expected cookie descriptors |
//! | [`predicate`] | The checks behind each builder, and their inversion |
//! | [`builder`] | [`Assertion`](builder::Assertion): secrets, predicates, fail-fast evaluation |
//! | [`expect`] | Free functions starting a fresh assertion |

pub mod builder;
pub mod exchange;
pub mod expect;
pub mod expected;
pub mod predicate;
