use crate::base::asserterror::AssertError;

#[test]
fn test_expectation_failure_display() {
    let err = AssertError::expectation("substance", "expected cookie to be set");
    assert_eq!(
        err.to_string(),
        "Expectation failed for cookie 'substance': expected cookie to be set"
    );
    assert_eq!(err.cookie_name(), Some("substance"));
}

#[test]
fn test_only_expectation_failures_are_invertible() {
    assert!(AssertError::expectation("a", "b").is_expectation_failure());
    assert!(!AssertError::invalid_argument("bad header").is_expectation_failure());
    assert!(!AssertError::construction("no expires").is_expectation_failure());
}

#[test]
fn test_non_expectation_errors_have_no_cookie() {
    let err = AssertError::construction("expected cookie to have expires or max-age");
    assert_eq!(err.cookie_name(), None);
    assert_eq!(
        err.to_string(),
        "Invalid expectation: expected cookie to have expires or max-age"
    );
}
