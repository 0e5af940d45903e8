use glam::Vec2;
use metaball_field::prelude::*;
use metaball_field_examples::{init_tracing, save_surface_png, RenderConfig, Walkers};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(42);
    let base = FieldConfig::default();
    let mut walkers = Walkers::new(base.screen_size.as_vec2());
    let spawned: Vec<(u32, Vec2)> = (0..10)
        .map(|_| walkers.spawn_random(&mut rng, 0.0))
        .collect();

    // Same sources, three strides: fewer evaluations, blockier edges.
    for skip in [1, 2, 4] {
        let config = base.clone().with_pixel_skip(skip);
        let mut field: MetaballField<u32> = MetaballField::try_new(config)?;
        field.initialize();
        for (i, (id, position)) in spawned.iter().enumerate() {
            field.add_entity_source(*id, *position, 120.0, 2 + (i % 6) as u8);
        }

        let stats = field.tick(&walkers).expect("field was initialized");
        tracing::info!(
            "pixel_skip {}: {} evaluations for {} pixels",
            skip,
            stats.raster.samples,
            stats.raster.pixels_written
        );

        let out = format!("field-pixel-skip-{skip}.png");
        save_surface_png(
            field.surface().expect("field was initialized"),
            &RenderConfig::default(),
            out,
        )?;
    }

    Ok(())
}
