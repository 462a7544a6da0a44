use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use zmark::{parse_document, write_document, FormatConfig};

const DOC: &str =
    "<?xml version=\"1.0\"?><root id=\"1\"><item value=\"42\" /><note>a &amp; b</note></root>";

fn bench_write_pretty(c: &mut Criterion) {
    let doc = parse_document(DOC).unwrap();
    let config = FormatConfig::default();
    c.bench_function("zmark_write_pretty", |b| {
        b.iter(|| write_document(black_box(&doc), &config))
    });
}

fn bench_write_compact(c: &mut Criterion) {
    let doc = parse_document(DOC).unwrap();
    let config = FormatConfig::compact();
    c.bench_function("zmark_write_compact", |b| {
        b.iter(|| write_document(black_box(&doc), &config))
    });
}

criterion_group!(benches, bench_write_pretty, bench_write_compact);
criterion_main!(benches);
