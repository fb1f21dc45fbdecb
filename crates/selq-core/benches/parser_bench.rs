//! Parser Benchmarks
//!
//! Run with: `cargo bench --package selq-core`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use selq_core::parse_selector;

fn bench_simple_tag(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");

    let query = "div";
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function("tag", |b| b.iter(|| parse_selector(black_box(query))));

    group.finish();
}

fn bench_compound_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_compound");

    let query = "div.main#hero[data-state^=\"active\"]:not(.hidden)";
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function("compound", |b| b.iter(|| parse_selector(black_box(query))));

    group.finish();
}

fn bench_combinator_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_combinators");

    let query = "body > main.content div.card:nth-child(2n+1) a[href^=\"/\"]";
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function("chain", |b| b.iter(|| parse_selector(black_box(query))));

    group.finish();
}

fn bench_or_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_or_group");

    let query = "h1, h2, h3, h4, article > p, section.intro :has(blockquote)";
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function("or_group", |b| b.iter(|| parse_selector(black_box(query))));

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_tag,
    bench_compound_selector,
    bench_combinator_chain,
    bench_or_group
);
criterion_main!(benches);
