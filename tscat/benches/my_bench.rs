use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tscat::{tr, Catalog, Resolver};

const FIXTURE: &str = include_str!("../tests/data/es.ts");

fn resolver() -> Resolver {
    Resolver::new(FIXTURE.parse().unwrap())
}

pub fn parse_catalog(c: &mut Criterion) {
    c.bench_function("parse_catalog", |b| {
        b.iter(|| black_box(FIXTURE).parse::<Catalog>().unwrap())
    });
}

pub fn translated_literal(c: &mut Criterion) {
    let resolver = resolver();
    c.bench_function("translated_literal", |b| {
        b.iter(|| tr!(resolver, "AboutDialog" => "Authors"))
    });
}

pub fn missing_literal(c: &mut Criterion) {
    let resolver = resolver();
    c.bench_function("missing_literal", |b| b.iter(|| {
        tr!(resolver, "AboutDialog" => "Hello, world! This is a longer sentence but without argument markers. That is all for now, thank you for reading.")
    }));
}

pub fn plural_argument(c: &mut Criterion) {
    let resolver = resolver();
    c.bench_function("plural_argument", |b| {
        b.iter(|| {
            tr!(resolver, "ByteViewTab" => "Frame %1 (%n packet(s))" % black_box(12), black_box(4096))
        })
    });
}

pub fn many_arguments(c: &mut Criterion) {
    let resolver = Resolver::untranslated();
    c.bench_function("many_arguments", |b| {
        b.iter(|| {
            tr!(
                resolver,
                "Planets" => "Hello %1 and %2 and %3 and %4 and %5 and %6 and %7 and finally %8!",
                black_box("Mercury"),
                black_box("Venus"),
                black_box("Earth"),
                black_box("Mars"),
                black_box("Jupiter"),
                black_box("Saturn"),
                black_box("Uranus"),
                black_box("Neptune"),
            )
        })
    });
}

criterion_group!(
    benches,
    parse_catalog,
    translated_literal,
    missing_literal,
    plural_argument,
    many_arguments
);
criterion_main!(benches);
