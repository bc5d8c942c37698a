//! Request/response pairs under test and the cookie state derived from them.

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};

use crate::base::asserterror::{AssertError, AssertResult};
use crate::base::context::HeaderResultExt;
use crate::cookies::collection::CookieCollection;
use crate::cookies::parsedcookie::ParseOptions;

/// Anything exposing the headers of a request and of its response.
///
/// Header access goes through [`HeaderMap`], so lookups are
/// case-insensitive.
pub trait CookieExchange {
    fn request_headers(&self) -> &HeaderMap;
    fn response_headers(&self) -> &HeaderMap;
}

impl<T: CookieExchange + ?Sized> CookieExchange for &T {
    fn request_headers(&self) -> &HeaderMap {
        (**self).request_headers()
    }

    fn response_headers(&self) -> &HeaderMap {
        (**self).response_headers()
    }
}

impl<B1, B2> CookieExchange for (http::Request<B1>, http::Response<B2>) {
    fn request_headers(&self) -> &HeaderMap {
        self.0.headers()
    }

    fn response_headers(&self) -> &HeaderMap {
        self.1.headers()
    }
}

/// Owned request/response header snapshot.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    request: HeaderMap,
    response: HeaderMap,
}

impl Exchange {
    pub fn new(request: HeaderMap, response: HeaderMap) -> Self {
        Self { request, response }
    }

    /// Build a snapshot from a raw `Cookie` header and raw `Set-Cookie` lines.
    ///
    /// ```
    /// use expectcookies::assertion::exchange::Exchange;
    ///
    /// let exchange = Exchange::from_raw(
    ///     Some("control=placebo"),
    ///     ["substance=active; Path=/; HttpOnly"],
    /// )?;
    /// # Ok::<(), expectcookies::AssertError>(())
    /// ```
    pub fn from_raw<'a, I>(cookie: Option<&str>, set_cookies: I) -> AssertResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut exchange = Self::default();
        if let Some(cookie) = cookie {
            exchange.request.append(COOKIE, header_value(cookie)?);
        }
        for line in set_cookies {
            exchange.response.append(SET_COOKIE, header_value(line)?);
        }
        Ok(exchange)
    }

    pub fn request_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.request
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response
    }
}

impl CookieExchange for Exchange {
    fn request_headers(&self) -> &HeaderMap {
        &self.request
    }

    fn response_headers(&self) -> &HeaderMap {
        &self.response
    }
}

fn header_value(raw: &str) -> AssertResult<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|e| AssertError::invalid_argument(format!("invalid header value {raw:?}: {e}")))
}

/// Request side: headers plus the cookies sent in `Cookie`.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub headers: &'a HeaderMap,
    pub cookies: CookieCollection,
}

impl<'a> RequestContext<'a> {
    /// Parse every `Cookie` header, in order. No header means no cookies.
    pub fn from_headers(headers: &'a HeaderMap, options: &ParseOptions) -> AssertResult<Self> {
        let mut cookies = CookieCollection::new();
        for value in headers.get_all(COOKIE) {
            let raw = std::str::from_utf8(value.as_bytes()).header_context("cookie")?;
            cookies.extend_from_cookie_header(raw, options);
        }
        Ok(Self { headers, cookies })
    }
}

/// Response side: headers plus one cookie per `Set-Cookie` line.
#[derive(Debug, Clone)]
pub struct ResponseContext<'a> {
    pub headers: &'a HeaderMap,
    pub cookies: CookieCollection,
}

impl<'a> ResponseContext<'a> {
    pub fn from_headers(headers: &'a HeaderMap, options: &ParseOptions) -> AssertResult<Self> {
        let lines = headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| std::str::from_utf8(value.as_bytes()).header_context("set-cookie"))
            .collect::<AssertResult<Vec<_>>>()?;

        Ok(Self {
            headers,
            cookies: CookieCollection::from_set_cookie(lines, options),
        })
    }
}
