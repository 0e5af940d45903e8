//! Source registry for entity-tracked and grid-fixed metaballs.
//!
//! Entity-tracked sources follow a host entity and are refreshed every frame by
//! [`SourceRegistry::resolve_positions`]. Grid-fixed sources sit at the center of a tile
//! cell and never move. Both kinds flatten into [`PointSource`]s for evaluation.
use std::fmt::Debug;

use glam::Vec2;
use tracing::trace;

use crate::host::EntityHost;

/// Strength used when the caller does not pick one.
pub const DEFAULT_STRENGTH: f32 = 100.0;
/// Palette index used when the caller does not pick one.
pub const DEFAULT_COLOR: u8 = 2;

/// A positioned source as consumed by the evaluator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointSource {
    pub position: Vec2,
    pub strength: f32,
    pub color: u8,
}

impl PointSource {
    pub fn new(position: Vec2, strength: f32, color: u8) -> Self {
        Self {
            position,
            strength,
            color,
        }
    }
}

/// A metaball bound to a host entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySource<K> {
    /// Host entity this source follows.
    pub entity: K,
    /// Last resolved world position.
    pub position: Vec2,
    pub strength: f32,
    pub color: u8,
}

impl<K> EntitySource<K> {
    pub fn new(entity: K, position: Vec2, strength: f32, color: u8) -> Self {
        Self {
            entity,
            position,
            strength,
            color,
        }
    }

    #[inline]
    pub fn point(&self) -> PointSource {
        PointSource::new(self.position, self.strength, self.color)
    }
}

/// A metaball pinned to the center of a tile cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSource {
    col: i32,
    row: i32,
    strength: f32,
    color: u8,
    world: Vec2,
}

impl GridSource {
    /// Creates a grid source; the world position is fixed from `cell_size` here.
    pub fn new(col: i32, row: i32, strength: f32, color: u8, cell_size: f32) -> Self {
        Self {
            col,
            row,
            strength,
            color,
            world: cell_center(col, row, cell_size),
        }
    }

    /// Cell coordinates as `(col, row)`.
    pub fn cell(&self) -> (i32, i32) {
        (self.col, self.row)
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    /// World position of the cell center captured at creation.
    pub fn world_position(&self) -> Vec2 {
        self.world
    }

    #[inline]
    pub fn point(&self) -> PointSource {
        PointSource::new(self.world, self.strength, self.color)
    }
}

/// World-space center of a grid cell.
#[inline]
pub fn cell_center(col: i32, row: i32, cell_size: f32) -> Vec2 {
    Vec2::new(
        col as f32 * cell_size + cell_size / 2.0,
        row as f32 * cell_size + cell_size / 2.0,
    )
}

/// Owns every live source of a field.
#[derive(Clone, Debug)]
pub struct SourceRegistry<K> {
    entities: Vec<EntitySource<K>>,
    grid: Vec<GridSource>,
}

impl<K> Default for SourceRegistry<K> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            grid: Vec::new(),
        }
    }
}

impl<K> SourceRegistry<K>
where
    K: Copy + Eq + Debug,
{
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `entity` as a source starting at `position`.
    /// Binding the same entity again adds a second, independent source.
    pub fn add_entity_source(&mut self, entity: K, position: Vec2, strength: f32, color: u8) {
        self.entities
            .push(EntitySource::new(entity, position, strength, color));
    }

    /// Removes the first source bound to `entity`. Returns `false` if there was none.
    pub fn remove_entity_source(&mut self, entity: K) -> bool {
        match self.entities.iter().position(|s| s.entity == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if at least one source is bound to `entity`.
    pub fn contains_entity(&self, entity: K) -> bool {
        self.entities.iter().any(|s| s.entity == entity)
    }

    pub fn add_grid_source(&mut self, col: i32, row: i32, strength: f32, color: u8, cell_size: f32) {
        self.grid
            .push(GridSource::new(col, row, strength, color, cell_size));
    }

    /// Drops every grid source and returns how many were removed.
    pub fn clear_grid_sources(&mut self) -> usize {
        let removed = self.grid.len();
        self.grid.clear();
        removed
    }

    pub fn entity_sources(&self) -> &[EntitySource<K>] {
        &self.entities
    }

    pub fn grid_sources(&self) -> &[GridSource] {
        &self.grid
    }

    pub fn entity_source_count(&self) -> usize {
        self.entities.len()
    }

    pub fn grid_source_count(&self) -> usize {
        self.grid.len()
    }

    /// Total number of sources of both kinds.
    pub fn len(&self) -> usize {
        self.entities.len() + self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.grid.is_empty()
    }

    /// Iterates all sources in evaluation order: entity sources first, then grid sources.
    pub fn iter_points(&self) -> impl Iterator<Item = PointSource> + '_ {
        self.entities
            .iter()
            .map(EntitySource::point)
            .chain(self.grid.iter().map(GridSource::point))
    }

    /// Copies all sources into `out` in evaluation order, replacing its contents.
    pub fn collect_points(&self, out: &mut Vec<PointSource>) {
        out.clear();
        out.reserve(self.len());
        out.extend(self.iter_points());
    }

    /// Refreshes entity source positions from the host.
    ///
    /// Sources whose entity no longer resolves keep their last position. Returns the
    /// number of such stale sources.
    pub fn resolve_positions<H>(&mut self, host: &H) -> usize
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        let mut stale = 0;
        for source in &mut self.entities {
            match host.entity_position(source.entity) {
                Some(position) => source.position = position,
                None => {
                    trace!("entity {:?} did not resolve; keeping last position", source.entity);
                    stale += 1;
                }
            }
        }
        stale
    }

    /// Removes entity sources whose entity no longer resolves. Returns how many were removed.
    pub fn prune_stale<H>(&mut self, host: &H) -> usize
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        let before = self.entities.len();
        self.entities
            .retain(|s| host.entity_position(s.entity).is_some());
        before - self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn grid_source_world_position_is_cell_center() {
        let source = GridSource::new(3, 2, DEFAULT_STRENGTH, DEFAULT_COLOR, 16.0);
        assert_eq!(source.world_position(), Vec2::new(56.0, 40.0));
        assert_eq!(source.world_position(), Vec2::new(56.0, 40.0));
        assert_eq!(source.cell(), (3, 2));
    }

    #[test]
    fn removing_entity_twice_is_a_noop() {
        let mut registry = SourceRegistry::new();
        registry.add_entity_source(1u32, Vec2::ZERO, 100.0, 2);
        registry.add_entity_source(2u32, Vec2::ZERO, 100.0, 2);

        assert!(registry.remove_entity_source(1));
        assert_eq!(registry.entity_source_count(), 1);
        assert!(!registry.remove_entity_source(1));
        assert_eq!(registry.entity_source_count(), 1);
    }

    #[test]
    fn duplicate_bindings_are_independent() {
        let mut registry = SourceRegistry::new();
        registry.add_entity_source(5u32, Vec2::ZERO, 100.0, 2);
        registry.add_entity_source(5u32, Vec2::ONE, 50.0, 3);
        assert_eq!(registry.entity_source_count(), 2);

        assert!(registry.remove_entity_source(5));
        assert!(registry.contains_entity(5));
        assert_eq!(registry.entity_sources()[0].strength, 50.0);
    }

    #[test]
    fn clear_grid_sources_keeps_entities() {
        let mut registry = SourceRegistry::new();
        registry.add_entity_source(1u32, Vec2::ZERO, 100.0, 2);
        registry.add_grid_source(0, 0, 100.0, 2, 16.0);
        registry.add_grid_source(1, 0, 100.0, 2, 16.0);

        assert_eq!(registry.clear_grid_sources(), 2);
        assert_eq!(registry.grid_source_count(), 0);
        assert_eq!(registry.entity_source_count(), 1);
    }

    #[test]
    fn resolve_positions_keeps_stale_sources() {
        let mut registry = SourceRegistry::new();
        registry.add_entity_source(1u32, Vec2::ZERO, 100.0, 2);
        registry.add_entity_source(2u32, Vec2::new(9.0, 9.0), 100.0, 2);

        let mut host = HashMap::new();
        host.insert(1u32, Vec2::new(4.0, 5.0));

        assert_eq!(registry.resolve_positions(&host), 1);
        assert_eq!(registry.entity_sources()[0].position, Vec2::new(4.0, 5.0));
        assert_eq!(registry.entity_sources()[1].position, Vec2::new(9.0, 9.0));
        assert_eq!(registry.entity_source_count(), 2);

        assert_eq!(registry.prune_stale(&host), 1);
        assert!(!registry.contains_entity(2));
    }

    #[test]
    fn points_list_entities_before_grid() {
        let mut registry = SourceRegistry::new();
        registry.add_grid_source(0, 0, 10.0, 4, 2.0);
        registry.add_entity_source(1u32, Vec2::new(7.0, 7.0), 20.0, 6);

        let mut points = Vec::new();
        registry.collect_points(&mut points);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], PointSource::new(Vec2::new(7.0, 7.0), 20.0, 6));
        assert_eq!(points[1], PointSource::new(Vec2::new(1.0, 1.0), 10.0, 4));
    }
}
