use std::path::Path;

use anyhow::Context;
use image::{imageops, Rgba, RgbaImage};
use metaball_field::prelude::{IndexedSurface, Palette};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How an indexed surface is turned into a PNG.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub palette: Palette,
    /// Integer upscale factor (nearest neighbour).
    pub scale: u32,
    /// RGB shown where the surface is transparent.
    pub background: [u8; 3],
}

impl RenderConfig {
    pub fn new(scale: u32) -> Self {
        Self {
            palette: Palette::arcade(),
            scale: scale.max(1),
            background: [24, 24, 32],
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(4)
    }
}

pub fn save_surface_png(
    surface: &IndexedSurface,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let size = surface.size();
    let [br, bg, bb] = rc.background;
    let img = RgbaImage::from_fn(size.x, size.y, |x, y| {
        let [r, g, b, a] = rc.palette.rgba(surface.get(x, y));
        if a == 0 {
            Rgba([br, bg, bb, 255])
        } else {
            Rgba([r, g, b, a])
        }
    });
    let img = if rc.scale > 1 {
        imageops::resize(
            &img,
            size.x * rc.scale,
            size.y * rc.scale,
            imageops::FilterType::Nearest,
        )
    } else {
        img
    };

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}
