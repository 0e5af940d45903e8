use glam::Vec2;
use metaball_field::prelude::*;
use metaball_field_examples::{init_tracing, save_surface_png, RenderConfig, Walkers};
use rand::rngs::StdRng;
use rand::SeedableRng;

const LEVEL: [&str; 8] = [
    "##########",
    "#........#",
    "#..##....#",
    "#........#",
    "#....##..#",
    "#........#",
    "#........#",
    "##########",
];

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = FieldConfig::default();
    let bounds = config.screen_size.as_vec2();
    let mut field: MetaballField<u32> = MetaballField::try_new(config)?;
    field.initialize();

    // Walls glow faintly; sprites are stronger and merge with them when close.
    let grid = WallGrid::from_ascii(16.0, &LEVEL)?;
    let walls = field.add_all_wall_sources(Some(&grid), 60.0, 8);
    tracing::info!("{} wall tiles became metaballs", walls);

    let mut rng = StdRng::seed_from_u64(7);
    let mut walkers = Walkers::new(bounds - Vec2::splat(32.0));
    for i in 0..6 {
        let (id, position) = walkers.spawn_random(&mut rng, 40.0);
        field.add_entity_source(id, position + Vec2::splat(16.0), 150.0, 2 + (i % 3) as u8);
    }

    let host = OffsetHost {
        walkers: &walkers,
        offset: Vec2::splat(16.0),
    };
    let mut sink = FnSink::new(|event| {
        if let FieldEvent::FrameRendered { stats } = event {
            tracing::debug!("frame {} colored {} samples", stats.frame, stats.raster.colored_samples);
        }
    });
    field.tick_with_events(&host, &mut sink);

    let rc = RenderConfig::default();
    save_surface_png(
        field.surface().expect("field was initialized"),
        &rc,
        "field-wall-tiles-0.png",
    )?;

    for _ in 0..30 {
        walkers.step(1.0 / 30.0);
    }
    let host = OffsetHost {
        walkers: &walkers,
        offset: Vec2::splat(16.0),
    };
    field.tick(&host);
    save_surface_png(
        field.surface().expect("field was initialized"),
        &rc,
        "field-wall-tiles-1.png",
    )?;

    // Clearing the walls leaves only the sprite blobs.
    field.clear_grid_sources();
    field.tick(&host);
    save_surface_png(
        field.surface().expect("field was initialized"),
        &rc,
        "field-wall-tiles-cleared.png",
    )?;

    Ok(())
}

// Walkers live inside the border walls, so shift them by one tile.
struct OffsetHost<'a> {
    walkers: &'a Walkers,
    offset: Vec2,
}

impl EntityHost for OffsetHost<'_> {
    type Entity = u32;

    fn entity_position(&self, entity: u32) -> Option<Vec2> {
        self.walkers
            .entity_position(entity)
            .map(|p| p + self.offset)
    }
}
