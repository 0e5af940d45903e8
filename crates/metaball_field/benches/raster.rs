mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::UVec2;
use metaball_field::prelude::{rasterize, FieldConfig, IndexedSurface};

const SOURCE_COUNTS: [usize; 4] = [4, 16, 64, 256];
const PIXEL_SKIPS: [u32; 3] = [1, 2, 4];

fn bench_rasterize(c: &mut Criterion) {
    let size = UVec2::new(160, 120);
    let mut group = c.benchmark_group("raster/rasterize");
    for &skip in &PIXEL_SKIPS {
        let config = FieldConfig::new(size).with_pixel_skip(skip);
        for &count in &SOURCE_COUNTS {
            let sources = common::spiral_sources(count, size.x as f32, size.y as f32);
            let mut surface = IndexedSurface::from_size(size);
            group.throughput(common::elements_throughput((size.x * size.y) as usize));
            group.bench_function(
                BenchmarkId::new(format!("skip{skip}"), count),
                |b| b.iter(|| black_box(rasterize(&sources, &config, &mut surface))),
            );
        }
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = bench_rasterize
}
criterion_main!(benches);
