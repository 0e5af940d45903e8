use std::collections::HashMap;

use glam::Vec2;
use metaball_field::prelude::*;
use metaball_field_examples::{init_tracing, save_surface_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // One strong source in the middle of the default 160x120 screen.
    let mut field: MetaballField<u32> = MetaballField::try_new(FieldConfig::default())?;
    field.initialize();

    let center = Vec2::new(80.0, 60.0);
    field.add_entity_source(0, center, 400.0, 5);

    let host: HashMap<u32, Vec2> = HashMap::from([(0, center)]);
    if let Some(stats) = field.tick(&host) {
        tracing::info!(
            "frame {}: {} samples, {} colored",
            stats.frame,
            stats.raster.samples,
            stats.raster.colored_samples
        );
    }

    // The colored disk ends where the influence drops to 1.0 (radius 20 for strength 400).
    for d in [0.0, 19.0, 20.0, 100.0] {
        let sample = field.sample(center + Vec2::new(d, 0.0));
        tracing::info!(
            "distance {:>5}: influence {:>8.3} -> color {}",
            d,
            sample.total_influence,
            sample.color()
        );
    }

    let surface = field.surface().expect("field was initialized");
    save_surface_png(surface, &RenderConfig::default(), "field-single-source.png")?;

    Ok(())
}
