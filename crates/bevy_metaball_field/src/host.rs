use std::sync::Arc;

use bevy::prelude::{Entity, GlobalTransform, Query, Resource};
use glam::Vec2;
use metaball_field::prelude::{EntityHost, TileGrid};

/// Maps a Bevy world position (origin at the screen center, y up) to surface pixels
/// (origin at the top-left corner, y down).
#[inline]
pub fn world_to_surface(world: Vec2, screen_size: Vec2) -> Vec2 {
    Vec2::new(world.x + screen_size.x * 0.5, screen_size.y * 0.5 - world.y)
}

/// Inverse of [`world_to_surface`].
#[inline]
pub fn surface_to_world(surface: Vec2, screen_size: Vec2) -> Vec2 {
    Vec2::new(surface.x - screen_size.x * 0.5, screen_size.y * 0.5 - surface.y)
}

/// [`EntityHost`] backed by a [`GlobalTransform`] query.
/// Despawned entities, or entities without a transform, do not resolve.
pub struct TransformHost<'a, 'w, 's, 't> {
    transforms: &'a Query<'w, 's, &'t GlobalTransform>,
    screen_size: Vec2,
}

impl<'a, 'w, 's, 't> TransformHost<'a, 'w, 's, 't> {
    pub fn new(transforms: &'a Query<'w, 's, &'t GlobalTransform>, screen_size: Vec2) -> Self {
        Self {
            transforms,
            screen_size,
        }
    }
}

impl EntityHost for TransformHost<'_, '_, '_, '_> {
    type Entity = Entity;

    fn entity_position(&self, entity: Entity) -> Option<Vec2> {
        self.transforms
            .get(entity)
            .ok()
            .map(|t| world_to_surface(t.translation().truncate(), self.screen_size))
    }
}

/// The tile grid that grid metaballs are resolved against. `None` means no tile map is active.
#[derive(Resource, Clone, Default)]
pub struct ActiveTileGrid(
    /// Shared tile grid, if any.
    pub Option<Arc<dyn TileGrid + Send + Sync>>,
);

impl ActiveTileGrid {
    pub fn new<G>(grid: G) -> Self
    where
        G: TileGrid + Send + Sync + 'static,
    {
        Self(Some(Arc::new(grid)))
    }

    /// Replaces the active grid.
    pub fn set<G>(&mut self, grid: G)
    where
        G: TileGrid + Send + Sync + 'static,
    {
        self.0 = Some(Arc::new(grid));
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn as_dyn(&self) -> Option<&dyn TileGrid> {
        self.0.as_deref().map(|g| g as &dyn TileGrid)
    }
}

#[cfg(test)]
mod tests {
    use metaball_field::prelude::WallGrid;

    use super::*;

    #[test]
    fn world_origin_maps_to_surface_center() {
        let size = Vec2::new(160.0, 120.0);
        assert_eq!(world_to_surface(Vec2::ZERO, size), Vec2::new(80.0, 60.0));
        assert_eq!(
            world_to_surface(Vec2::new(-80.0, 60.0), size),
            Vec2::new(0.0, 0.0)
        );
    }

    #[test]
    fn surface_roundtrip() {
        let size = Vec2::new(160.0, 120.0);
        let p = Vec2::new(13.0, 97.0);
        assert_eq!(world_to_surface(surface_to_world(p, size), size), p);
    }

    #[test]
    fn active_grid_exposes_trait_object() {
        let mut active = ActiveTileGrid::default();
        assert!(active.as_dyn().is_none());
        active.set(WallGrid::from_ascii(8.0, &["#"]).unwrap());
        let grid = active.as_dyn().unwrap();
        assert_eq!(grid.cell_size(), 8.0);
        assert!(grid.is_wall(0, 0));
        active.clear();
        assert!(active.as_dyn().is_none());
    }
}
