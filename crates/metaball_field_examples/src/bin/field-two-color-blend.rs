use std::collections::HashMap;

use glam::{UVec2, Vec2};
use metaball_field::prelude::*;
use metaball_field_examples::{init_tracing, save_surface_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Two equal sources with colors 2 and 8. Where they overlap, the palette index is the
    // influence-weighted average, so the seam between them shows the intermediate indices.
    let config = FieldConfig::new(UVec2::new(200, 100)).with_pixel_skip(1);
    let mut field: MetaballField<&'static str> = MetaballField::try_new(config)?;
    field.initialize();

    let left = Vec2::new(80.0, 50.0);
    let right = Vec2::new(120.0, 50.0);
    field.add_entity_source("left", left, 1000.0, 2);
    field.add_entity_source("right", right, 1000.0, 8);

    let host = HashMap::from([("left", left), ("right", right)]);
    field.tick(&host);

    let midpoint = field.sample((left + right) * 0.5);
    tracing::info!(
        "midpoint influence {:.2}, color {}",
        midpoint.total_influence,
        midpoint.color()
    );

    let surface = field.surface().expect("field was initialized");
    save_surface_png(surface, &RenderConfig::new(3), "field-two-color-blend.png")?;

    Ok(())
}
