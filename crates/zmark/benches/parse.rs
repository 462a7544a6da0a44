use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use zmark::parse_document;

const SIMPLE_DOC: &str = "<?xml version=\"1.0\"?><root><child>text</child></root>";
const ATTR_DOC: &str =
    "<?xml version=\"1.0\"?><root id=\"1\" name='test'><item value=\"42\" /></root>";
const NESTED_DOC: &str =
    "<a><a><a><a>deep</a></a></a><a>wide</a><b x=\"1\"/><c>1 &lt; 2</c></a>";

fn bench_simple(c: &mut Criterion) {
    c.bench_function("zmark_parse_simple", |b| {
        b.iter(|| parse_document(black_box(SIMPLE_DOC)))
    });
}

fn bench_attr(c: &mut Criterion) {
    c.bench_function("zmark_parse_attr", |b| {
        b.iter(|| parse_document(black_box(ATTR_DOC)))
    });
}

fn bench_nested(c: &mut Criterion) {
    c.bench_function("zmark_parse_nested", |b| {
        b.iter(|| parse_document(black_box(NESTED_DOC)))
    });
}

criterion_group!(benches, bench_simple, bench_attr, bench_nested);
criterion_main!(benches);
