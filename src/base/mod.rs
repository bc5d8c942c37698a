//! Base types and error handling.
//!
//! - [`AssertError`](asserterror::AssertError): the crate-wide error taxonomy
//! - [`HeaderResultExt`](context::HeaderResultExt): header decoding context

pub mod asserterror;
pub mod context;

#[cfg(test)]
mod tests;
