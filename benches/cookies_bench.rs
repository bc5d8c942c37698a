use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expectcookies::assertion::builder::Assertion;
use expectcookies::assertion::exchange::Exchange;
use expectcookies::assertion::expected::ExpectedCookie;
use expectcookies::cookies::collection::CookieCollection;
use expectcookies::cookies::parsedcookie::{parse, ParseOptions};
use expectcookies::cookies::signature::sign;

fn benchmark_cookie_parse(c: &mut Criterion) {
    c.bench_function("cookie_parse", |b| {
        b.iter(|| {
            black_box(parse(black_box(
                "substance=s%3Aactive.sig; Domain=domain.com; Path=/; Expires=Wed, 21 Oct 2015 07:28:00 GMT; HttpOnly",
            )));
        })
    });
}

fn benchmark_cookie_header(c: &mut Criterion) {
    let header: String = (0..100)
        .map(|i| format!("cookie{i}=val{i}"))
        .collect::<Vec<_>>()
        .join("; ");
    let options = ParseOptions::default();

    c.bench_function("cookie_header_collection", |b| {
        b.iter(|| {
            black_box(CookieCollection::from_cookie_header(black_box(&header), &options));
        })
    });
}

fn benchmark_assertion_check(c: &mut Criterion) {
    let signed = format!("substance=s:{}; Domain=domain.com; Path=/; HttpOnly", sign("active", "b"));
    let exchange = Exchange::from_raw(Some("control=placebo"), [signed.as_str(), "other=1"]).unwrap();
    let assertion = Assertion::with_secret(["one", "a", "two", "b"])
        .set(ExpectedCookie::named("substance").options(["domain", "path", "httponly"]))
        .new([ExpectedCookie::named("substance"), ExpectedCookie::named("other")])
        .contain(ExpectedCookie::named("substance").value("active").domain("domain.com"));

    c.bench_function("assertion_check", |b| {
        b.iter(|| {
            black_box(assertion.check(black_box(&exchange))).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_cookie_parse,
    benchmark_cookie_header,
    benchmark_assertion_check
);
criterion_main!(benches);
