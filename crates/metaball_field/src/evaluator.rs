//! Field evaluator: aggregates source influence and blended color at sample points.
//!
//! Each source contributes `strength / dist²` when it is inside the cutoff radius and its
//! contribution exceeds the influence threshold. The displayed color is the
//! influence-weighted average of contributing palette indices, shown only where the total
//! influence exceeds `1.0`.
use glam::Vec2;

use crate::config::FieldConfig;
use crate::source::PointSource;

/// Total influence above which a sample is colored.
pub const ISO_LEVEL: f32 = 1.0;

/// Aggregated field value at one sample point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSample {
    /// Sum of accepted influences.
    pub total_influence: f32,
    /// Sum of `color * influence` over accepted sources.
    pub color_sum: f32,
}

impl FieldSample {
    /// Whether the sample lies inside the iso-surface.
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.total_influence > ISO_LEVEL
    }

    /// Final palette index: the weighted average color inside the surface, `0` outside.
    #[inline]
    pub fn color(&self) -> u8 {
        if self.is_inside() {
            (self.color_sum / self.total_influence).floor() as u8
        } else {
            0
        }
    }
}

/// Evaluates a source set against the cutoffs of a [`FieldConfig`].
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    max_distance_sq: f32,
    min_distance_sq: f32,
    threshold: f32,
}

impl Evaluator {
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            max_distance_sq: config.max_distance_sq(),
            min_distance_sq: config.min_distance_sq,
            threshold: config.influence_threshold,
        }
    }

    /// Influence of a single source at squared distance `dist_sq`, or `0.0` when rejected.
    #[inline]
    pub fn influence(&self, strength: f32, dist_sq: f32) -> f32 {
        if dist_sq >= self.max_distance_sq {
            return 0.0;
        }
        let influence = strength / dist_sq.max(self.min_distance_sq);
        if influence <= self.threshold {
            return 0.0;
        }
        influence
    }

    /// Evaluates all `sources` at `point`, in slice order.
    pub fn evaluate(&self, sources: &[PointSource], point: Vec2) -> FieldSample {
        let mut sample = FieldSample::default();
        for source in sources {
            self.accumulate(&mut sample, source, point);
        }
        sample
    }

    /// Adds the contribution of `source` at `point` to `sample`.
    #[inline]
    pub fn accumulate(&self, sample: &mut FieldSample, source: &PointSource, point: Vec2) {
        let influence = self.influence(source.strength, point.distance_squared(source.position));
        if influence != 0.0 {
            sample.total_influence += influence;
            sample.color_sum += source.color as f32 * influence;
        }
    }

    /// Evaluates `sources` at many points.
    pub fn evaluate_positions(&self, sources: &[PointSource], points: &[Vec2]) -> Vec<FieldSample> {
        points.iter().map(|p| self.evaluate(sources, *p)).collect()
    }
}

/// Evaluates `sources` at `point` with the cutoffs of `config`.
pub fn evaluate(sources: &[PointSource], point: Vec2, config: &FieldConfig) -> FieldSample {
    Evaluator::new(config).evaluate(sources, point)
}
