mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use metaball_field::prelude::{Evaluator, FieldConfig};

const SOURCE_COUNTS: [usize; 5] = [1, 8, 32, 128, 512];

fn bench_evaluate(c: &mut Criterion) {
    let config = FieldConfig::default();
    let evaluator = Evaluator::new(&config);
    let points: Vec<Vec2> = (0..64)
        .map(|i| Vec2::new((i % 8) as f32 * 20.0, (i / 8) as f32 * 15.0))
        .collect();

    let mut group = c.benchmark_group("evaluator/evaluate_positions");
    for &count in &SOURCE_COUNTS {
        let sources = common::spiral_sources(count, 160.0, 120.0);
        group.throughput(common::elements_throughput(points.len() * count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &sources, |b, sources| {
            b.iter(|| black_box(evaluator.evaluate_positions(sources, black_box(&points))));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bench_evaluate
}
criterion_main!(benches);
