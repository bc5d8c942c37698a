//! Ergonomic error context helpers.
//!
//! Converts raw header access failures into context-rich `AssertError`
//! variants naming the header that could not be read.

use crate::base::asserterror::AssertError;
use std::str::Utf8Error;

/// Extension trait for adding header context to UTF-8 decoding results.
pub trait HeaderResultExt<T> {
    /// Name the header whose value failed to decode.
    ///
    /// # Example
    /// ```
    /// use expectcookies::base::context::HeaderResultExt;
    ///
    /// let raw: &[u8] = b"session=\xff";
    /// let err = std::str::from_utf8(raw).header_context("set-cookie").unwrap_err();
    /// assert!(err.to_string().contains("set-cookie"));
    /// ```
    fn header_context(self, header: &str) -> Result<T, AssertError>;
}

impl<T> HeaderResultExt<T> for Result<T, Utf8Error> {
    fn header_context(self, header: &str) -> Result<T, AssertError> {
        self.map_err(|e| {
            AssertError::invalid_argument(format!("{header} header value must be a string: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_context() {
        let bytes = vec![b'a', b'=', 0xc3, 0x28];
        let err = std::str::from_utf8(&bytes)
            .header_context("cookie")
            .unwrap_err();

        match err {
            AssertError::InvalidArgument(reason) => {
                assert!(reason.starts_with("cookie header value must be a string"));
            }
            _ => panic!("Expected InvalidArgument"),
        }
    }

    #[test]
    fn test_header_context_passes_ok_through() {
        let ok = std::str::from_utf8(b"a=b").header_context("cookie").unwrap();
        assert_eq!(ok, "a=b");
    }
}
