use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use exhaust::{
    lists::{lists, lists_lex},
    permutation::{permutations_finite, prefix_permutations},
    subsets::subsets,
};

fn bench_lists(c: &mut Criterion) {
    c.bench_function("first_10k_lists_binary", |b| {
        b.iter(|| {
            for xs in lists([0u8, 1]).take(10_000) {
                black_box(xs);
            }
        })
    });

    c.bench_function("lists_lex_len8_base4", |b| {
        b.iter(|| black_box(lists_lex(8, 0..4u8).count()))
    });
}

fn bench_permutations(c: &mut Criterion) {
    c.bench_function("permutations_of_9", |b| {
        b.iter(|| black_box(permutations_finite(0..9u8).count()))
    });

    c.bench_function("first_10k_prefix_permutations", |b| {
        b.iter(|| {
            for p in prefix_permutations(0u32..).take(10_000) {
                black_box(p.prefix().len());
            }
        })
    });

    c.bench_function("subsets_of_16", |b| {
        b.iter(|| black_box(subsets(0..16u32).count()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .warm_up_time(std::time::Duration::from_secs(1))
        .measurement_time(std::time::Duration::from_secs(5));
    targets = bench_lists, bench_permutations
);
criterion_main!(benches);
