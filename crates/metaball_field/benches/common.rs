use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use metaball_field::prelude::PointSource;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Deterministic sources spread over a `width` x `height` area on a golden-angle spiral.
pub fn spiral_sources(count: usize, width: f32, height: f32) -> Vec<PointSource> {
    let center = Vec2::new(width * 0.5, height * 0.5);
    let radius = width.min(height) * 0.45;
    let golden = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let t = (i as f32 + 0.5) / count.max(1) as f32;
            let angle = i as f32 * golden;
            let r = radius * t.sqrt();
            let position = center + Vec2::new(angle.cos(), angle.sin()) * r;
            PointSource::new(position, 100.0 + (i % 7) as f32 * 50.0, (i % 15 + 1) as u8)
        })
        .collect()
}
