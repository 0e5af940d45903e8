//! Field configuration: surface size, sampling stride and falloff cutoffs.
use glam::UVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default surface size, matching a 160x120 handheld screen.
pub const DEFAULT_SCREEN_SIZE: UVec2 = UVec2::new(160, 120);
/// Default stride between coarse samples in pixels.
pub const DEFAULT_PIXEL_SKIP: u32 = 2;
/// Contributions at or below this influence are discarded.
pub const DEFAULT_INFLUENCE_THRESHOLD: f32 = 0.1;
/// Sources at or beyond this distance contribute nothing.
pub const DEFAULT_MAX_DISTANCE: f32 = 200.0;
/// Lower bound for squared distances, keeps sources sitting on a sample finite.
pub const DEFAULT_MIN_DISTANCE_SQ: f32 = 1.0;
/// Cell size used for grid sources when no tile grid is active.
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Configuration for a [`crate::field::MetaballField`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Size of the output surface in pixels.
    pub screen_size: UVec2,
    /// Stride between evaluated samples; each sample fills a `pixel_skip`² block.
    pub pixel_skip: u32,
    /// Minimum influence a single source needs to be accumulated.
    pub influence_threshold: f32,
    /// Cutoff radius in world units.
    pub max_distance: f32,
    /// Squared distances are clamped to at least this value.
    pub min_distance_sq: f32,
    /// Cell size used when no tile grid is active.
    pub default_cell_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            screen_size: DEFAULT_SCREEN_SIZE,
            pixel_skip: DEFAULT_PIXEL_SKIP,
            influence_threshold: DEFAULT_INFLUENCE_THRESHOLD,
            max_distance: DEFAULT_MAX_DISTANCE,
            min_distance_sq: DEFAULT_MIN_DISTANCE_SQ,
            default_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl FieldConfig {
    /// Creates a new [`FieldConfig`] for a surface of the given size.
    pub fn new(screen_size: UVec2) -> Self {
        Self {
            screen_size,
            ..Default::default()
        }
    }

    /// Sets the coarse sampling stride.
    pub fn with_pixel_skip(mut self, pixel_skip: u32) -> Self {
        self.pixel_skip = pixel_skip;
        self
    }

    /// Sets the per-source influence threshold.
    pub fn with_influence_threshold(mut self, influence_threshold: f32) -> Self {
        self.influence_threshold = influence_threshold;
        self
    }

    /// Sets the cutoff radius.
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Sets the lower clamp for squared distances.
    pub fn with_min_distance_sq(mut self, min_distance_sq: f32) -> Self {
        self.min_distance_sq = min_distance_sq;
        self
    }

    /// Sets the fallback cell size for grid sources.
    pub fn with_default_cell_size(mut self, default_cell_size: f32) -> Self {
        self.default_cell_size = default_cell_size;
        self
    }

    /// Squared cutoff radius.
    #[inline]
    pub fn max_distance_sq(&self) -> f32 {
        self.max_distance * self.max_distance
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.screen_size.x == 0 || self.screen_size.y == 0 {
            return Err(Error::InvalidConfig(
                "screen_size must be > 0 in both components".into(),
            ));
        }
        if self.pixel_skip == 0 {
            return Err(Error::InvalidConfig("pixel_skip must be > 0".into()));
        }
        if self.max_distance <= 0.0 {
            return Err(Error::InvalidConfig("max_distance must be > 0".into()));
        }
        if self.min_distance_sq <= 0.0 {
            return Err(Error::InvalidConfig("min_distance_sq must be > 0".into()));
        }
        if self.default_cell_size <= 0.0 {
            return Err(Error::InvalidConfig(
                "default_cell_size must be > 0".into(),
            ));
        }

        Ok(())
    }
}
