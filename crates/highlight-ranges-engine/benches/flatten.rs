use criterion::{Criterion, criterion_group, criterion_main};
use highlight_ranges_engine::RangeTree;
mod common;

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    group.sample_size(10);

    let mut tree = RangeTree::new();
    tree.insert_all(common::generate_ranges(2_000, 8_000, 40), false)
        .unwrap();

    group.bench_function("collect_ranges", |b| {
        b.iter(|| std::hint::black_box(tree.flatten()));
    });

    group.bench_function("clone_subtree", |b| {
        b.iter(|| std::hint::black_box(tree.clone_subtree(tree.root())));
    });

    group.finish();
}

criterion_group!(benches, bench_flatten);
criterion_main!(benches);
