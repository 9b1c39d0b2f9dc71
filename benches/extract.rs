use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

use emlextract::extract::sanitize::sanitize;

fn bench_sanitize(c: &mut Criterion) {
    let subject = "Fwd: RE: [EXTERNAL] Q3 results / forecast   (draft #2) -- please review!!!";

    c.bench_function("sanitize_subject", |b| b.iter(|| sanitize(subject)));
}

fn bench_parse_fixture(c: &mut Criterion) {
    let fixture_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("inline_and_attachment.eml");
    let raw = std::fs::read(&fixture_path).unwrap();

    c.bench_function("parse_inline_and_attachment", |b| {
        b.iter(|| emlextract::parser::eml::parse_message(&raw).unwrap())
    });
}

criterion_group!(benches, bench_sanitize, bench_parse_fixture);
criterion_main!(benches);
