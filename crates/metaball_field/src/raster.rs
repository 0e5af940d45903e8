//! Indexed-color surfaces and the block rasterizer.
//!
//! The rasterizer evaluates the field once per `pixel_skip`² block and replicates the
//! resulting palette index over the block.
use glam::{UVec2, Vec2};

use crate::config::FieldConfig;
use crate::evaluator::Evaluator;
use crate::source::PointSource;

/// A pixel target addressed by palette index.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_pixel(&mut self, x: u32, y: u32, color: u8);
}

/// Row-major surface of palette indices. Index `0` is transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl IndexedSurface {
    /// Create a new surface, initializing all pixels to `0`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_size(size: UVec2) -> Self {
        Self::new(size.x, size.y)
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Get the palette index at the given pixel, returning `0` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Raw row-major pixel data.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn fill(&mut self, color: u8) {
        self.data.fill(color);
    }

    /// Number of pixels that are not transparent.
    pub fn count_colored(&self) -> usize {
        self.data.iter().filter(|c| **c != 0).count()
    }
}

impl PixelSurface for IndexedSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: u8) {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = color;
        }
    }
}

/// Work done by one rasterizer pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Evaluator invocations.
    pub samples: usize,
    /// Samples that landed inside the iso-surface.
    pub colored_samples: usize,
    /// Pixels written, including background.
    pub pixels_written: usize,
}

/// Renders `sources` into `surface`, one evaluation per coarse block.
pub fn rasterize<S>(sources: &[PointSource], config: &FieldConfig, surface: &mut S) -> RasterStats
where
    S: PixelSurface + ?Sized,
{
    let evaluator = Evaluator::new(config);
    let skip = config.pixel_skip.max(1);
    let (width, height) = (surface.width(), surface.height());
    let mut stats = RasterStats::default();

    for x in (0..width).step_by(skip as usize) {
        let x_end = (x + skip).min(width);
        for y in (0..height).step_by(skip as usize) {
            let sample = evaluator.evaluate(sources, Vec2::new(x as f32, y as f32));
            let color = sample.color();
            stats.samples += 1;
            if color != 0 {
                stats.colored_samples += 1;
            }

            let y_end = (y + skip).min(height);
            for fx in x..x_end {
                for fy in y..y_end {
                    surface.set_pixel(fx, fy, color);
                }
            }
            stats.pixels_written += ((x_end - x) * (y_end - y)) as usize;
        }
    }

    stats
}
