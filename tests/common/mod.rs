//! Shared fixtures: `Set-Cookie` lines are produced with the `cookie` crate,
//! the way a server framework would emit them.
#![allow(dead_code)]

use cookie::{Cookie, CookieBuilder};
use expectcookies::assertion::exchange::Exchange;
use expectcookies::cookies::signature::{sign, SIGNED_PREFIX};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const SECRETS: [&str; 4] = ["one", "a", "two", "b"];

/// Fixed instant so comparisons never depend on the clock.
pub fn base_time() -> OffsetDateTime {
    datetime!(2024-03-05 10:00:00 UTC)
}

pub fn seconds(n: i64) -> Duration {
    Duration::seconds(n)
}

pub fn substance() -> CookieBuilder<'static> {
    Cookie::build(("substance", "active"))
        .domain("domain.com")
        .path("/")
}

/// `substance` signed with `secret`, as `s:active.<signature>`.
pub fn signed_substance(secret: &str) -> CookieBuilder<'static> {
    Cookie::build((
        "substance",
        format!("{SIGNED_PREFIX}{}", sign("active", secret)),
    ))
    .domain("domain.com")
    .path("/")
}

/// Render a builder as a percent-encoded `Set-Cookie` line.
pub fn header(builder: CookieBuilder<'_>) -> String {
    builder.build().encoded().to_string()
}

pub fn exchange(cookie: Option<&str>, set_cookies: &[String]) -> Exchange {
    Exchange::from_raw(cookie, set_cookies.iter().map(String::as_str)).unwrap()
}
