use thiserror::Error;

/// Errors raised while building or evaluating cookie assertions.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AssertError {
    /// Input that cannot be inspected at all, e.g. a header that is not UTF-8.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A registered predicate did not hold for the observed cookies.
    #[error("Expectation failed for cookie '{cookie}': {message}")]
    ExpectationFailure { cookie: String, message: String },

    /// A builder was given an expectation it cannot evaluate.
    #[error("Invalid expectation: {0}")]
    ConstructionError(String),
}

/// Result alias used across the crate.
pub type AssertResult<T = ()> = Result<T, AssertError>;

impl AssertError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        AssertError::InvalidArgument(reason.into())
    }

    pub fn expectation(cookie: impl Into<String>, message: impl Into<String>) -> Self {
        AssertError::ExpectationFailure {
            cookie: cookie.into(),
            message: message.into(),
        }
    }

    pub fn construction(reason: impl Into<String>) -> Self {
        AssertError::ConstructionError(reason.into())
    }

    /// True for failures a `not` modifier may invert.
    pub fn is_expectation_failure(&self) -> bool {
        matches!(self, AssertError::ExpectationFailure { .. })
    }

    /// Name of the cookie an expectation failure refers to.
    pub fn cookie_name(&self) -> Option<&str> {
        match self {
            AssertError::ExpectationFailure { cookie, .. } => Some(cookie),
            _ => None,
        }
    }
}
