//! `Max-Age` and `Expires` coercion.
//!
//! Both attributes are stored as text by the parser and only coerced when
//! compared. A value that cannot be coerced is treated as absent.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// IMF-fixdate, the form servers emit (`Wed, 21 Oct 2015 07:28:00 GMT`).
const IMF_FIXDATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Netscape draft form (`Wed, 21-Oct-2015 07:28:00 GMT`).
const NETSCAPE_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
);

/// ANSI C `asctime()` form (`Wed Oct  1 07:28:00 2015`).
const ASCTIME_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
);

/// Integer coercion with leading-digit semantics: `"60"`, `" 60s"` and
/// `"+60"` all give 60, `"sixty"` gives `None`. Out-of-range numbers
/// saturate to `i64::MAX` / `i64::MIN`.
pub fn parse_max_age(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, sign_len) = match s.as_bytes().first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let digits = &s[sign_len..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let number = &s[..sign_len + end];
    Some(number.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Parse an `Expires` value. Accepts IMF-fixdate, RFC 2822, the Netscape
/// dashed form, asctime and RFC 3339.
pub fn parse_expires(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = parse_utc(raw, IMF_FIXDATE) {
        return Some(date);
    }
    if let Ok(date) = OffsetDateTime::parse(raw, &Rfc2822) {
        return Some(date);
    }
    if let Some(date) = parse_utc(raw, NETSCAPE_DATE) {
        return Some(date);
    }
    if let Some(date) = parse_utc(raw, ASCTIME_DATE) {
        return Some(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

/// Format an instant as IMF-fixdate in UTC.
pub fn format_http_date(date: OffsetDateTime) -> String {
    let utc = date.to_offset(UtcOffset::UTC);
    utc.format(IMF_FIXDATE)
        .unwrap_or_else(|_| utc.to_string())
}

fn parse_utc(raw: &str, description: &[BorrowedFormatItem<'_>]) -> Option<OffsetDateTime> {
    PrimitiveDateTime::parse(raw, description)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
