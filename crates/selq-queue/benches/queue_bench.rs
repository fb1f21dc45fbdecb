//! TokenQueue Benchmarks
//!
//! Run with: `cargo bench --package selq-queue`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use selq_queue::TokenQueue;

fn bench_consume_element_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_element_selector");

    let input = "div.main#hero[data-state]";
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("consume_element_selector", |b| {
        b.iter(|| {
            let mut q = TokenQueue::new(black_box(input));
            q.consume_element_selector()
        })
    });

    group.finish();
}

fn bench_chomp_balanced(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_chomp_balanced");

    let input = r#"(data-x="nested (groups) with \"escapes\"")rest"#;
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("chomp_balanced", |b| {
        b.iter(|| {
            let mut q = TokenQueue::new(black_box(input));
            q.chomp_balanced('(', ')')
        })
    });

    group.finish();
}

fn bench_consume_to_any(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_consume_to_any");

    let input = "data-state^=active]";
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("consume_to_any", |b| {
        b.iter(|| {
            let mut q = TokenQueue::new(black_box(input));
            q.consume_to_any(&["=", "!=", "^=", "$=", "*=", "~="])
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_consume_element_selector,
    bench_chomp_balanced,
    bench_consume_to_any
);
criterion_main!(benches);
