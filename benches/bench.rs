use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typed_uri::{
    component::Query,
    pct_enc::{encode, normalise, table::*},
    AbsoluteUri, Uri,
};

criterion_group!(
    benches,
    bench_enc,
    bench_pct_normalise,
    bench_parse,
    bench_parse_relative,
    bench_normalise,
    bench_normalise_memoised,
    bench_resolve,
    bench_query_get,
);
criterion_main!(benches);

const ENC_CASE: &str = "te😃a 测1`~!@试#$%st^&+=";

fn bench_enc(c: &mut Criterion) {
    c.bench_function("enc", |b| b.iter(|| encode(black_box(ENC_CASE), QUERY)));
}

const PCT_CASE: &str = "te%f0%9f%98%83a%20%e6%b5%8b1%60%7E!@%E8%AF%95%23$%25st%5E&+=";

fn bench_pct_normalise(c: &mut Criterion) {
    c.bench_function("pct_normalise", |b| {
        b.iter(|| normalise(black_box(PCT_CASE), QUERY, RESERVED))
    });
}

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Uri::parse(black_box(PARSE_CASE))));
}

fn bench_parse_relative(c: &mut Criterion) {
    c.bench_function("parse_relative", |b| {
        b.iter(|| Uri::parse(black_box("../a/./b;c?d=e")))
    });
}

const NORMALISE_CASE: &str = "HTTPS://User@EXAMPLE.com:443/a/./b/../%7ec/%2f?Q=%4a#%5B";

fn bench_normalise(c: &mut Criterion) {
    c.bench_function("normalise", |b| {
        b.iter(|| Uri::parse(black_box(NORMALISE_CASE)).map(|r| r.normalise()))
    });
}

fn bench_normalise_memoised(c: &mut Criterion) {
    let r = Uri::parse(NORMALISE_CASE).unwrap();
    c.bench_function("normalise_memoised", |b| {
        b.iter(|| black_box(&r).normalise())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let base = AbsoluteUri::parse("http://example.com/foo/bar/baz?q").unwrap();
    let r = Uri::parse("../../../foo/./bar/../baz#f").unwrap();
    c.bench_function("resolve", |b| {
        b.iter(|| black_box(&base).resolve(black_box(&r)))
    });
}

fn bench_query_get(c: &mut Criterion) {
    let q = Query::parse("a=1&b=2&c=3&lang=rust&lang=c&%6Cang=go&z").unwrap();
    c.bench_function("query_get", |b| b.iter(|| black_box(&q).get("lang")));
}
