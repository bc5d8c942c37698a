//! Cookie predicates.
//!
//! Every builder on [`Assertion`](crate::assertion::builder::Assertion)
//! registers one predicate per expected cookie. A predicate captures its
//! expectation when built and is evaluated against the parsed request and
//! response cookies. With `assert = false` the outcome is inverted: a
//! failed expectation passes, a met expectation fails.

use std::sync::Arc;
use time::OffsetDateTime;

use crate::assertion::exchange::{RequestContext, ResponseContext};
use crate::assertion::expected::{ExpectedCookie, ExpectedValue};
use crate::base::asserterror::{AssertError, AssertResult};
use crate::cookies::expiry::{format_http_date, parse_expires, parse_max_age};
use crate::cookies::parsedcookie::{AttributeValue, CookieRecord};
use crate::cookies::signature::{Unsigner, SIGNED_PREFIX};

/// A registered check over request and response cookies.
pub type Predicate =
    Arc<dyn Fn(&RequestContext<'_>, &ResponseContext<'_>) -> AssertResult + Send + Sync>;

/// Wrap a closure as a [`Predicate`].
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(&RequestContext<'_>, &ResponseContext<'_>) -> AssertResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Cookie is set in the response with every expected option.
pub fn set(expect: ExpectedCookie, assert: bool) -> Predicate {
    let description = if expect.options.is_empty() {
        "be set".to_string()
    } else {
        let keys: Vec<&str> = expect.options.keys().map(String::as_str).collect();
        format!("be set with options [{}]", keys.join(", "))
    };
    guarded(expect, assert, description, |expect, _, res| {
        let cookie = set_cookie(expect, res)?;
        match_options(expect, cookie)
    })
}

/// Cookie was sent with the request and is set again in the response.
pub fn reset(expect: ExpectedCookie, assert: bool) -> Predicate {
    guarded(expect, assert, "be reset".to_string(), |expect, req, res| {
        sent_cookie(expect, req)?;
        set_cookie(expect, res).map(|_| ())
    })
}

/// Cookie is set in the response and was not sent with the request.
pub fn new(expect: ExpectedCookie, assert: bool) -> Predicate {
    guarded(expect, assert, "be new".to_string(), |expect, req, res| {
        set_cookie(expect, res)?;
        if req.cookies.contains(&expect.name) {
            return Err(AssertError::expectation(
                &expect.name,
                "was already sent with the request",
            ));
        }
        Ok(())
    })
}

/// Cookie is sent, set again, and its expiry moved forward.
///
/// Fails to build when the expectation has neither a valid `expires` nor an
/// integer `max-age`.
pub fn renew(expect: ExpectedCookie, assert: bool) -> AssertResult<Predicate> {
    let threshold = RenewThreshold::from_expectation(&expect)?;
    Ok(guarded(
        expect,
        assert,
        "be renewed".to_string(),
        move |expect, req, res| {
            sent_cookie(expect, req)?;
            let cookie = set_cookie(expect, res)?;
            threshold.check(&expect.name, cookie)
        },
    ))
}

/// Cookie value equals the expected value (directly or once unsigned with a
/// candidate secret) and every expected option matches.
pub fn contain(
    expect: ExpectedCookie,
    assert: bool,
    secrets: Vec<String>,
    unsigner: Arc<dyn Unsigner>,
) -> Predicate {
    guarded(
        expect,
        assert,
        "contain the expected value and options".to_string(),
        move |expect, _, res| {
            let cookie = set_cookie(expect, res)?;

            if let Some(expected) = &expect.value {
                let candidates = expect.secret.iter().chain(secrets.iter());
                if cookie.value != *expected
                    && !signed_value_matches(&cookie.value, expected, candidates, unsigner.as_ref())
                {
                    return Err(AssertError::expectation(
                        &expect.name,
                        format!("expected value '{expected}' but was '{}'", cookie.value),
                    ));
                }
            }

            match_options(expect, cookie)
        },
    )
}

fn guarded<F>(expect: ExpectedCookie, assert: bool, description: String, check: F) -> Predicate
where
    F: Fn(&ExpectedCookie, &RequestContext<'_>, &ResponseContext<'_>) -> AssertResult
        + Send
        + Sync
        + 'static,
{
    predicate(move |req, res| {
        let outcome = check(&expect, req, res);
        if assert {
            return outcome;
        }
        match outcome {
            Ok(()) => Err(AssertError::expectation(
                &expect.name,
                format!("expected cookie to NOT {description}"),
            )),
            Err(e) if e.is_expectation_failure() => Ok(()),
            Err(e) => Err(e),
        }
    })
}

fn set_cookie<'r>(
    expect: &ExpectedCookie,
    res: &'r ResponseContext<'_>,
) -> AssertResult<&'r CookieRecord> {
    res.cookies
        .find(&expect.name)
        .ok_or_else(|| AssertError::expectation(&expect.name, "was not set in the response"))
}

fn sent_cookie<'r>(
    expect: &ExpectedCookie,
    req: &'r RequestContext<'_>,
) -> AssertResult<&'r CookieRecord> {
    req.cookies
        .find(&expect.name)
        .ok_or_else(|| AssertError::expectation(&expect.name, "was not sent with the request"))
}

fn match_options(expect: &ExpectedCookie, cookie: &CookieRecord) -> AssertResult {
    for (key, expected) in &expect.options {
        match_option(&expect.name, cookie, key, expected.as_ref())?;
    }
    Ok(())
}

fn match_option(
    name: &str,
    cookie: &CookieRecord,
    key: &str,
    expected: Option<&ExpectedValue>,
) -> AssertResult {
    let observed = cookie.option(key);
    match (expected, observed) {
        (Some(ExpectedValue::Flag(false)), None) => Ok(()),
        (Some(ExpectedValue::Flag(false)), Some(value)) => Err(AssertError::expectation(
            name,
            format!("expected option '{key}' to be absent but was '{value}'"),
        )),
        (_, None) => Err(AssertError::expectation(
            name,
            format!("expected option '{key}' to be set"),
        )),
        (None, Some(_)) | (Some(ExpectedValue::Flag(true)), Some(_)) => Ok(()),
        (Some(expected), Some(value)) => {
            if option_equals(key, expected, value) {
                Ok(())
            } else {
                Err(AssertError::expectation(
                    name,
                    format!("expected option '{key}' to be {expected} but was '{value}'"),
                ))
            }
        }
    }
}

fn option_equals(key: &str, expected: &ExpectedValue, observed: &AttributeValue) -> bool {
    let Some(text) = observed.as_str() else {
        return matches!(expected, ExpectedValue::Flag(true));
    };

    match expected {
        ExpectedValue::Text(s) if key == "expires" => match (parse_expires(s), parse_expires(text)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        ExpectedValue::Text(s) if key == "max-age" => match (parse_max_age(s), parse_max_age(text)) {
            (Some(a), Some(b)) => a == b,
            _ => s == text,
        },
        ExpectedValue::Text(s) => s == text,
        ExpectedValue::Number(n) => parse_max_age(text) == Some(*n),
        ExpectedValue::Date(d) => {
            parse_expires(text).map(OffsetDateTime::unix_timestamp) == Some(d.unix_timestamp())
        }
        ExpectedValue::Flag(present) => *present,
    }
}

fn signed_value_matches<'s, I>(
    observed: &str,
    expected: &str,
    mut secrets: I,
    unsigner: &dyn Unsigner,
) -> bool
where
    I: Iterator<Item = &'s String>,
{
    let Some(payload) = observed.get(SIGNED_PREFIX.len()..) else {
        return false;
    };
    match secrets.find_map(|secret| unsigner.unsign(payload, secret)) {
        Some(unsigned) => {
            tracing::trace!(value = %unsigned, "signed cookie value verified");
            unsigned == expected
        }
        None => false,
    }
}

/// Baseline a renewed cookie must exceed.
#[derive(Debug, Clone, Copy)]
struct RenewThreshold {
    expires: Option<OffsetDateTime>,
    max_age: Option<i64>,
}

impl RenewThreshold {
    fn from_expectation(expect: &ExpectedCookie) -> AssertResult<Self> {
        let expires = match expect.expected("expires") {
            Some(ExpectedValue::Text(s)) => parse_expires(s),
            Some(ExpectedValue::Date(d)) => Some(*d),
            _ => None,
        };
        let max_age = match expect.expected("max-age") {
            Some(ExpectedValue::Number(n)) => Some(*n),
            Some(ExpectedValue::Text(s)) => parse_max_age(s),
            _ => None,
        };

        if expires.is_none() && max_age.is_none() {
            return Err(AssertError::construction(
                "expected cookie to have expires or max-age",
            ));
        }
        Ok(Self { expires, max_age })
    }

    fn check(&self, name: &str, cookie: &CookieRecord) -> AssertResult {
        let observed_expires = cookie.expires();
        let observed_max_age = cookie.max_age();

        let later = self
            .expires
            .zip(observed_expires)
            .is_some_and(|(threshold, observed)| observed > threshold);
        let longer = self
            .max_age
            .zip(observed_max_age)
            .is_some_and(|(threshold, observed)| observed > threshold);

        if later || longer {
            return Ok(());
        }

        let mut reasons = Vec::new();
        if let Some(threshold) = self.expires {
            reasons.push(format!(
                "expires {} is not after '{}'",
                observed_expires
                    .map(|d| format!("'{}'", format_http_date(d)))
                    .unwrap_or_else(|| "(absent)".to_string()),
                format_http_date(threshold)
            ));
        }
        if let Some(threshold) = self.max_age {
            reasons.push(format!(
                "max-age {} is not greater than {threshold}",
                observed_max_age
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "(absent)".to_string())
            ));
        }
        Err(AssertError::expectation(
            name,
            format!("was not renewed: {}", reasons.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::collection::CookieCollection;
    use crate::cookies::parsedcookie::{parse, ParseOptions};
    use crate::cookies::signature::{sign, HmacSha256Signer};
    use http::HeaderMap;

    fn run(predicate: &Predicate, cookie: &str, set_cookies: &[&str]) -> AssertResult {
        let headers = HeaderMap::new();
        let options = ParseOptions::default();
        let req = RequestContext {
            headers: &headers,
            cookies: CookieCollection::from_cookie_header(cookie, &options),
        };
        let res = ResponseContext {
            headers: &headers,
            cookies: CookieCollection::from_set_cookie(set_cookies.iter().copied(), &options),
        };
        (**predicate)(&req, &res)
    }

    #[test]
    fn test_match_option_kinds() {
        let cookie = parse("a=b; Domain=x.com; Max-Age=60; Secure");

        assert!(match_option("a", &cookie, "domain", None).is_ok());
        assert!(match_option("a", &cookie, "path", None).is_err());
        assert!(match_option("a", &cookie, "max-age", Some(&ExpectedValue::Number(60))).is_ok());
        assert!(match_option("a", &cookie, "max-age", Some(&"60".into())).is_ok());
        assert!(match_option("a", &cookie, "secure", Some(&ExpectedValue::Flag(true))).is_ok());
        assert!(match_option("a", &cookie, "httponly", Some(&ExpectedValue::Flag(false))).is_ok());
        assert!(match_option("a", &cookie, "secure", Some(&ExpectedValue::Flag(false))).is_err());
        assert!(match_option("a", &cookie, "domain", Some(&"y.com".into())).is_err());
    }

    #[test]
    fn test_flag_attribute_does_not_equal_text() {
        let cookie = parse("a=b; Secure");
        assert!(match_option("a", &cookie, "secure", Some(&"true".into())).is_err());
    }

    #[test]
    fn test_expires_compared_as_instants() {
        let cookie = parse("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT");
        let same = ExpectedValue::Text("2015-10-21T07:28:00Z".into());
        assert!(match_option("a", &cookie, "expires", Some(&same)).is_ok());
    }

    #[test]
    fn test_unparseable_expires_never_matches() {
        let cookie = parse("a=b; Expires=someday");
        assert!(match_option("a", &cookie, "expires", Some(&"someday".into())).is_err());
        assert!(match_option("a", &cookie, "expires", None).is_ok());

        let valid = parse("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT");
        assert!(match_option("a", &valid, "expires", Some(&"later".into())).is_err());
    }

    #[test]
    fn test_signing_prefix_always_dropped() {
        let signer = HmacSha256Signer;
        let secrets = vec!["correct".to_string()];
        let signed = sign("active", "correct");

        let prefixed = format!("{SIGNED_PREFIX}{signed}");
        assert!(signed_value_matches(&prefixed, "active", secrets.iter(), &signer));
        assert!(!signed_value_matches(&signed, "active", secrets.iter(), &signer));
        assert!(!signed_value_matches("s", "active", secrets.iter(), &signer));
    }

    #[test]
    fn test_renew_requires_threshold() {
        let err = renew(ExpectedCookie::named("a").option("expires", "never"), true).err();
        assert_eq!(
            err,
            Some(AssertError::construction(
                "expected cookie to have expires or max-age"
            ))
        );
    }

    #[test]
    fn test_renew_either_threshold_suffices() {
        let p = renew(
            ExpectedCookie::named("a")
                .max_age(60)
                .option("expires", "Wed, 21 Oct 2015 07:28:00 GMT"),
            true,
        )
        .unwrap();

        assert!(run(&p, "a=1", &["a=1; Max-Age=61"]).is_ok());
        assert!(run(&p, "a=1", &["a=1; Expires=Thu, 22 Oct 2015 07:28:00 GMT"]).is_ok());
        assert!(run(&p, "a=1", &["a=1; Max-Age=60; Expires=Wed, 21 Oct 2015 07:28:00 GMT"]).is_err());
    }

    #[test]
    fn test_inverted_predicate_message() {
        let p = new(ExpectedCookie::named("a"), false);
        let err = run(&p, "", &["a=1"]).unwrap_err();
        assert_eq!(
            err,
            AssertError::expectation("a", "expected cookie to NOT be new")
        );
        assert!(run(&p, "a=1", &["a=1"]).is_ok());
    }

    #[test]
    fn test_contain_signed_fallback_uses_descriptor_secrets_first() {
        let signed = format!("a=s%3A{}", sign("active", "correct").replace('+', "%2B"));
        let p = contain(
            ExpectedCookie::named("a").value("active").secret("correct"),
            true,
            vec!["wrong".to_string()],
            Arc::new(HmacSha256Signer),
        );
        assert!(run(&p, "", &[signed.as_str()]).is_ok());
    }

    #[test]
    fn test_contain_mismatch_reports_both_values() {
        let p = contain(
            ExpectedCookie::named("a").value("active"),
            true,
            vec!["wrong".to_string()],
            Arc::new(HmacSha256Signer),
        );
        let err = run(&p, "", &["a=passive"]).unwrap_err();
        assert_eq!(
            err,
            AssertError::expectation("a", "expected value 'active' but was 'passive'")
        );
    }
}
