//! Bevy plugin for metaball_field: a screen-sized metaball overlay that follows entities and
//! tile-map walls.
#![forbid(unsafe_code)]

#[cfg(feature = "ron")]
pub use assets::{TileGridAsset, TileGridAssetLoader};
use bevy::prelude::*;
pub use events::{
    AddMetaball, AddTileMetaball, AddWallMetaballs, ClearTileMetaballs, FieldFrameMessage,
    InitializeField, RemoveMetaball,
};
pub use host::{surface_to_world, world_to_surface, ActiveTileGrid, TransformHost};
use metaball_field::prelude::{FieldConfig, MetaballField};
pub use surface::{create_field_image, upload_surface, FieldPalette, FieldSurface};

#[cfg(feature = "ron")]
mod assets;
mod events;
mod host;
mod surface;

/// Convenient re-exports for common types. Import with `use bevy_metaball_field::prelude::*;`.
pub mod prelude {
    pub use metaball_field::prelude::*;

    #[cfg(feature = "ron")]
    pub use crate::assets::{TileGridAsset, TileGridAssetLoader};
    pub use crate::events::{
        AddMetaball, AddTileMetaball, AddWallMetaballs, ClearTileMetaballs, FieldFrameMessage,
        InitializeField, RemoveMetaball,
    };
    pub use crate::host::{ActiveTileGrid, TransformHost};
    pub use crate::surface::{FieldPalette, FieldSurface};
    pub use crate::{Metaballs, MetaballFieldPlugin};
}

/// Bevy plugin providing the field resource, entry-point observers and the per-frame system.
#[derive(Clone, Debug, Default)]
pub struct MetaballFieldPlugin {
    /// Field configuration. Invalid configurations fall back to the default.
    pub config: FieldConfig,
    /// Drop metaballs whose entity was despawned instead of keeping their last position.
    pub prune_despawned: bool,
}

impl MetaballFieldPlugin {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            prune_despawned: false,
        }
    }

    pub fn with_prune_despawned(mut self, prune_despawned: bool) -> Self {
        self.prune_despawned = prune_despawned;
        self
    }
}

/// The metaball field, keyed by Bevy [`Entity`].
#[derive(Resource, Debug, Default)]
pub struct Metaballs(
    /// Underlying field.
    pub MetaballField<Entity>,
);

/// Runtime options copied from [`MetaballFieldPlugin`].
#[derive(Resource, Debug, Clone, Copy, Default)]
struct FieldSettings {
    prune_despawned: bool,
}

impl Plugin for MetaballFieldPlugin {
    fn build(&self, app: &mut App) {
        let field = match MetaballField::try_new(self.config.clone()) {
            Ok(field) => field,
            Err(err) => {
                warn!("MetaballFieldPlugin config invalid, using defaults: {}", err);
                MetaballField::default()
            }
        };

        app.add_message::<FieldFrameMessage>()
            .insert_resource(Metaballs(field))
            .insert_resource(FieldSettings {
                prune_despawned: self.prune_despawned,
            })
            .init_resource::<ActiveTileGrid>()
            .init_resource::<FieldPalette>()
            .add_systems(Update, tick_field)
            .add_observer(initialize_field)
            .add_observer(add_metaball)
            .add_observer(remove_metaball)
            .add_observer(add_tile_metaball)
            .add_observer(add_wall_metaballs)
            .add_observer(clear_tile_metaballs);

        #[cfg(feature = "ron")]
        app.init_asset::<TileGridAsset>()
            .init_asset_loader::<TileGridAssetLoader>();
    }
}

fn initialize_field(
    _event: On<InitializeField>,
    mut commands: Commands,
    mut field: ResMut<Metaballs>,
    mut images: ResMut<Assets<Image>>,
) {
    if !field.0.initialize() {
        return;
    }

    let size = field.0.config().screen_size;
    let image = images.add(create_field_image(size));
    let sprite = commands.spawn(Sprite::from_image(image.clone())).id();
    commands.insert_resource(FieldSurface { image, sprite });
    info!("Metaball field surface {}x{} presented by {:?}", size.x, size.y, sprite);
}

fn add_metaball(
    event: On<AddMetaball>,
    mut field: ResMut<Metaballs>,
    transforms: Query<&GlobalTransform>,
) {
    let screen_size = field.0.config().screen_size.as_vec2();
    let host = TransformHost::new(&transforms, screen_size);
    let resolved = field.0.add_entity_source_from_host(
        &host,
        event.entity,
        world_to_surface(Vec2::ZERO, screen_size),
        event.strength,
        event.color,
    );
    if !resolved {
        warn!(
            "AddMetaball target {:?} has no GlobalTransform; starting at the world origin.",
            event.entity
        );
    }
}

fn remove_metaball(event: On<RemoveMetaball>, mut field: ResMut<Metaballs>) {
    field.0.remove_entity_source(event.entity);
}

fn add_tile_metaball(
    event: On<AddTileMetaball>,
    mut field: ResMut<Metaballs>,
    grid: Res<ActiveTileGrid>,
) {
    field.0.add_grid_source_at(
        grid.as_dyn(),
        event.col,
        event.row,
        event.strength,
        event.color,
    );
}

fn add_wall_metaballs(
    event: On<AddWallMetaballs>,
    mut field: ResMut<Metaballs>,
    grid: Res<ActiveTileGrid>,
) {
    let added = field
        .0
        .add_all_wall_sources(grid.as_dyn(), event.strength, event.color);
    debug!("AddWallMetaballs added {} tile metaballs", added);
}

fn clear_tile_metaballs(_event: On<ClearTileMetaballs>, mut field: ResMut<Metaballs>) {
    field.0.clear_grid_sources();
}

fn tick_field(
    settings: Res<FieldSettings>,
    mut field: ResMut<Metaballs>,
    transforms: Query<&GlobalTransform>,
    surface: Option<Res<FieldSurface>>,
    palette: Res<FieldPalette>,
    mut images: ResMut<Assets<Image>>,
    mut messages: ResMut<Messages<FieldFrameMessage>>,
) {
    let screen_size = field.0.config().screen_size.as_vec2();
    let host = TransformHost::new(&transforms, screen_size);

    if settings.prune_despawned {
        field.0.prune_stale_sources(&host);
    }

    let Some(stats) = field.0.tick(&host) else {
        return;
    };

    if let (Some(surface), Some(pixels)) = (surface, field.0.surface()) {
        if let Some(mut image) = images.get_mut(&surface.image) {
            if !upload_surface(pixels, &palette.0, &mut image) {
                warn!("Metaball field image does not match the surface; skipping upload.");
            }
        }
    }

    messages.write(FieldFrameMessage { stats });
}
