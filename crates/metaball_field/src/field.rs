//! The metaball field context: registry, configuration and output surface.
//!
//! A [`MetaballField`] is driven by its host. Register sources between frames and call
//! [`MetaballField::tick`] once per frame. Every entry point is a no-op rather than an
//! error when its precondition is missing (no surface yet, no tile grid, unknown entity).
use std::fmt::Debug;

use glam::Vec2;
use tracing::{debug, info};

use crate::config::FieldConfig;
use crate::error::Result;
use crate::evaluator::{Evaluator, FieldSample};
use crate::events::{EventSink, FieldEvent};
use crate::host::{EntityHost, TileGrid};
use crate::raster::{rasterize, IndexedSurface, PixelSurface, RasterStats};
use crate::source::{PointSource, SourceRegistry};

/// Statistics for one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at `1` for the first rendered frame.
    pub frame: u64,
    /// Entity sources whose entity did not resolve this frame.
    pub stale_sources: usize,
    /// Total sources evaluated.
    pub sources: usize,
    /// Rasterizer work.
    pub raster: RasterStats,
}

/// A metaball field keyed by host entity type `K`.
#[derive(Clone, Debug)]
pub struct MetaballField<K> {
    config: FieldConfig,
    registry: SourceRegistry<K>,
    surface: Option<IndexedSurface>,
    frame: u64,
    scratch: Vec<PointSource>,
}

impl<K> MetaballField<K>
where
    K: Copy + Eq + Debug,
{
    /// Creates a field, validating `config`.
    pub fn try_new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn new(config: FieldConfig) -> Self {
        debug_assert!(config.pixel_skip > 0, "pixel_skip must be > 0");
        Self {
            config,
            registry: SourceRegistry::new(),
            surface: None,
            frame: 0,
            scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry<K> {
        &self.registry
    }

    /// Allocates the output surface. Returns `false` if it already exists.
    pub fn initialize(&mut self) -> bool {
        if self.surface.is_some() {
            return false;
        }
        let size = self.config.screen_size;
        self.surface = Some(IndexedSurface::from_size(size));
        info!("metaball field initialized at {}x{}", size.x, size.y);
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// The rendered surface, once [`Self::initialize`] has run.
    pub fn surface(&self) -> Option<&IndexedSurface> {
        self.surface.as_ref()
    }

    /// Number of frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Binds `entity` as a source, seeded at its current `position`.
    pub fn add_entity_source(&mut self, entity: K, position: Vec2, strength: f32, color: u8) {
        self.registry
            .add_entity_source(entity, position, strength, color);
    }

    /// Binds `entity` as a source seeded from `host`. Falls back to `fallback` when the
    /// entity does not resolve yet; returns whether it resolved.
    pub fn add_entity_source_from_host<H>(
        &mut self,
        host: &H,
        entity: K,
        fallback: Vec2,
        strength: f32,
        color: u8,
    ) -> bool
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        let resolved = host.entity_position(entity);
        if resolved.is_none() {
            debug!("{:?} has no position yet; seeding at {:?}", entity, fallback);
        }
        self.registry.add_entity_source(
            entity,
            resolved.unwrap_or(fallback),
            strength,
            color,
        );
        resolved.is_some()
    }

    /// Removes the first source bound to `entity`. Unknown entities are ignored.
    pub fn remove_entity_source(&mut self, entity: K) -> bool {
        let removed = self.registry.remove_entity_source(entity);
        if !removed {
            debug!("no metaball bound to {:?}", entity);
        }
        removed
    }

    /// Adds a source at the center of cell (`col`, `row`).
    ///
    /// The cell size comes from `grid`, or from the configured fallback when no grid is active.
    pub fn add_grid_source_at(
        &mut self,
        grid: Option<&dyn TileGrid>,
        col: i32,
        row: i32,
        strength: f32,
        color: u8,
    ) {
        let cell_size = self.cell_size(grid);
        self.registry
            .add_grid_source(col, row, strength, color, cell_size);
    }

    /// Adds a source for every wall cell covering the surface. Returns how many were added.
    ///
    /// Does nothing without an active grid.
    pub fn add_all_wall_sources(
        &mut self,
        grid: Option<&dyn TileGrid>,
        strength: f32,
        color: u8,
    ) -> usize {
        let Some(grid) = grid else {
            debug!("no active tile grid; skipping wall scan");
            return 0;
        };
        let cell_size = self.cell_size(Some(grid));
        if !is_usable_cell_size(cell_size) {
            debug!("unusable cell size {}; skipping wall scan", cell_size);
            return 0;
        }
        let size = self.config.screen_size;
        let cols = (size.x as f32 / cell_size).ceil() as i32;
        let rows = (size.y as f32 / cell_size).ceil() as i32;

        let mut added = 0;
        for col in 0..cols {
            for row in 0..rows {
                if grid.is_wall(col, row) {
                    self.registry
                        .add_grid_source(col, row, strength, color, cell_size);
                    added += 1;
                }
            }
        }
        debug!("added {} wall sources from {}x{} cells", added, cols, rows);
        added
    }

    /// Removes all grid sources. Entity sources are kept.
    pub fn clear_grid_sources(&mut self) -> usize {
        self.registry.clear_grid_sources()
    }

    /// Removes entity sources whose entity no longer resolves.
    pub fn prune_stale_sources<H>(&mut self, host: &H) -> usize
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        let pruned = self.registry.prune_stale(host);
        if pruned > 0 {
            debug!("pruned {} stale metaball sources", pruned);
        }
        pruned
    }

    /// Field value at an arbitrary point using the current source positions.
    pub fn sample(&self, point: Vec2) -> FieldSample {
        let evaluator = Evaluator::new(&self.config);
        let mut sample = FieldSample::default();
        for source in self.registry.iter_points() {
            evaluator.accumulate(&mut sample, &source, point);
        }
        sample
    }

    /// Renders the current sources into a host-provided surface without touching the
    /// owned one.
    pub fn render_into<S>(&mut self, surface: &mut S) -> RasterStats
    where
        S: PixelSurface + ?Sized,
    {
        self.registry.collect_points(&mut self.scratch);
        rasterize(&self.scratch, &self.config, surface)
    }

    /// Runs one frame: refresh entity positions, then rasterize into the owned surface.
    ///
    /// Returns `None` before [`Self::initialize`].
    pub fn tick<H>(&mut self, host: &H) -> Option<FrameStats>
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        self.tick_with_events(host, &mut ())
    }

    /// Like [`Self::tick`], reporting progress to `sink`.
    pub fn tick_with_events<H>(&mut self, host: &H, sink: &mut dyn EventSink) -> Option<FrameStats>
    where
        H: EntityHost<Entity = K> + ?Sized,
    {
        let surface = self.surface.as_mut()?;
        let frame = self.frame + 1;

        let stale = self.registry.resolve_positions(host);
        sink.send(FieldEvent::PositionsResolved {
            frame,
            resolved: self.registry.entity_source_count() - stale,
            stale,
        });
        if stale > 0 {
            debug!("frame {}: {} metaball sources kept stale positions", frame, stale);
            sink.send(FieldEvent::Warning {
                context: format!("frame {frame}"),
                message: format!("{stale} entity sources did not resolve"),
            });
        }

        self.registry.collect_points(&mut self.scratch);
        let raster = rasterize(&self.scratch, &self.config, surface);
        self.frame = frame;

        let stats = FrameStats {
            frame,
            stale_sources: stale,
            sources: self.scratch.len(),
            raster,
        };
        sink.send(FieldEvent::FrameRendered { stats });
        Some(stats)
    }
}

impl<K> Default for MetaballField<K>
where
    K: Copy + Eq + Debug,
{
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl<K> MetaballField<K> {
    /// Grid cell size, or the configured fallback when there is no grid or the grid
    /// reports a zero, negative or non-finite size.
    fn cell_size(&self, grid: Option<&dyn TileGrid>) -> f32 {
        match grid.map(|g| g.cell_size()) {
            Some(size) if is_usable_cell_size(size) => size,
            Some(size) => {
                debug!(
                    "tile grid cell size {} is unusable; using {}",
                    size, self.config.default_cell_size
                );
                self.config.default_cell_size
            }
            None => self.config.default_cell_size,
        }
    }
}

#[inline]
fn is_usable_cell_size(size: f32) -> bool {
    size.is_finite() && size > 0.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use glam::UVec2;

    use super::*;
    use crate::events::VecSink;
    use crate::host::WallGrid;
    use crate::source::{GridSource, DEFAULT_COLOR, DEFAULT_STRENGTH};

    type Field = MetaballField<u32>;

    fn host(entries: &[(u32, Vec2)]) -> HashMap<u32, Vec2> {
        entries.iter().copied().collect()
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut field = Field::default();
        assert!(!field.is_initialized());
        assert!(field.initialize());
        assert!(!field.initialize());
        assert_eq!(field.surface().unwrap().size(), UVec2::new(160, 120));
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        assert!(Field::try_new(FieldConfig::default().with_pixel_skip(0)).is_err());
        assert!(Field::try_new(FieldConfig::default()).is_ok());
    }

    #[test]
    fn tick_before_initialize_does_nothing() {
        let mut field = Field::default();
        field.add_entity_source(1, Vec2::ZERO, DEFAULT_STRENGTH, DEFAULT_COLOR);
        assert!(field.tick(&host(&[])).is_none());
        assert_eq!(field.frame(), 0);
    }

    #[test]
    fn tick_follows_entity_position() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(64, 64)));
        field.initialize();
        field.add_entity_source(1, Vec2::new(10.0, 10.0), 400.0, 5);

        let stats = field.tick(&host(&[(1, Vec2::new(40.0, 40.0))])).unwrap();
        assert_eq!(stats.frame, 1);
        assert_eq!(stats.sources, 1);
        assert_eq!(stats.stale_sources, 0);
        assert_eq!(stats.raster.samples, 32 * 32);

        let surface = field.surface().unwrap();
        assert_eq!(surface.get(40, 40), 5);
        assert_eq!(surface.get(10, 10), 0);
    }

    #[test]
    fn missing_entity_keeps_last_position() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(32, 32)));
        field.initialize();
        field.add_entity_source(1, Vec2::new(8.0, 8.0), 400.0, 5);

        let mut sink = VecSink::new();
        let stats = field.tick_with_events(&host(&[]), &mut sink).unwrap();
        assert_eq!(stats.stale_sources, 1);
        assert_eq!(field.registry().entity_source_count(), 1);
        assert_eq!(field.surface().unwrap().get(8, 8), 5);
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, FieldEvent::Warning { .. })));
        assert!(matches!(
            sink.as_slice().last(),
            Some(FieldEvent::FrameRendered { stats: s }) if s.frame == 1
        ));

        assert_eq!(field.prune_stale_sources(&host(&[])), 1);
        assert!(field.registry().is_empty());
    }

    #[test]
    fn grid_source_uses_fallback_cell_size_without_grid() {
        let mut field = Field::default();
        field.add_grid_source_at(None, 3, 2, DEFAULT_STRENGTH, DEFAULT_COLOR);
        let source = field.registry().grid_sources()[0];
        assert_eq!(source.world_position(), Vec2::new(56.0, 40.0));

        let grid = WallGrid::new(8.0, 4, 4);
        field.add_grid_source_at(Some(&grid), 3, 2, DEFAULT_STRENGTH, DEFAULT_COLOR);
        let source = field.registry().grid_sources()[1];
        assert_eq!(source.world_position(), Vec2::new(28.0, 20.0));
    }

    #[test]
    fn wall_scan_adds_one_source_per_visible_wall() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(40, 20)));
        field.add_entity_source(9, Vec2::ZERO, DEFAULT_STRENGTH, DEFAULT_COLOR);

        // 40x20 at cell size 16 covers 3x2 cells; the wall at column 4 is off screen.
        let grid = WallGrid::from_ascii(16.0, &["#.#.#", "..#..", "#####"]).unwrap();
        let added = field.add_all_wall_sources(Some(&grid), DEFAULT_STRENGTH, DEFAULT_COLOR);
        assert_eq!(added, 3);
        assert_eq!(field.registry().grid_source_count(), 3);

        assert_eq!(field.clear_grid_sources(), 3);
        assert_eq!(field.registry().grid_source_count(), 0);
        assert_eq!(field.registry().entity_source_count(), 1);
    }

    struct FixedCellGrid(f32);

    impl TileGrid for FixedCellGrid {
        fn cell_size(&self) -> f32 {
            self.0
        }

        fn is_wall(&self, _col: i32, _row: i32) -> bool {
            true
        }
    }

    #[test]
    fn degenerate_grid_cell_size_falls_back_to_config() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(20, 10)));
        for size in [0.0, -8.0, f32::NAN, f32::INFINITY] {
            field.clear_grid_sources();
            let grid = FixedCellGrid(size);
            // 20x10 at the fallback cell size 16 covers 2x1 cells.
            let added = field.add_all_wall_sources(Some(&grid), DEFAULT_STRENGTH, DEFAULT_COLOR);
            assert_eq!(added, 2);
            assert_eq!(
                field.registry().grid_sources()[1].world_position(),
                Vec2::new(24.0, 8.0)
            );

            field.add_grid_source_at(Some(&grid), 0, 0, DEFAULT_STRENGTH, DEFAULT_COLOR);
            assert_eq!(
                field.registry().grid_sources()[2].world_position(),
                Vec2::new(8.0, 8.0)
            );
        }
    }

    #[test]
    fn wall_scan_with_degenerate_fallback_adds_nothing() {
        let config = FieldConfig::new(UVec2::new(4, 4)).with_default_cell_size(0.0);
        let mut field = Field::new(config);
        let added = field.add_all_wall_sources(Some(&FixedCellGrid(0.0)), 100.0, 2);
        assert_eq!(added, 0);
        assert!(field.registry().is_empty());
    }

    #[test]
    fn wall_sources_keep_position_when_grid_changes() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(32, 32)));
        let mut grid = WallGrid::from_ascii(16.0, &["#.", ".#"]).unwrap();
        assert_eq!(field.add_all_wall_sources(Some(&grid), 100.0, 2), 2);
        let before: Vec<Vec2> = field
            .registry()
            .grid_sources()
            .iter()
            .map(GridSource::world_position)
            .collect();
        assert_eq!(before, vec![Vec2::new(8.0, 8.0), Vec2::new(24.0, 24.0)]);

        grid.set_wall(0, 0, false);
        grid.set_wall(1, 0, true);
        let resized = WallGrid::from_ascii(4.0, &["####"]).unwrap();
        field.add_grid_source_at(Some(&resized), 0, 0, 100.0, 2);

        let after: Vec<Vec2> = field.registry().grid_sources()[..2]
            .iter()
            .map(GridSource::world_position)
            .collect();
        assert_eq!(after, before);
        assert_eq!(field.registry().grid_sources()[2].world_position(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn host_seeded_source_uses_entity_position() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(32, 32)));
        let known = host(&[(1, Vec2::new(20.0, 12.0))]);

        assert!(field.add_entity_source_from_host(&known, 1, Vec2::ZERO, 400.0, 5));
        assert!(!field.add_entity_source_from_host(&known, 2, Vec2::new(3.0, 4.0), 400.0, 5));

        let sources = field.registry().entity_sources();
        assert_eq!(sources[0].position, Vec2::new(20.0, 12.0));
        assert_eq!(sources[1].position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn wall_scan_without_grid_is_noop() {
        let mut field = Field::default();
        assert_eq!(field.add_all_wall_sources(None, 100.0, 2), 0);
        assert!(field.registry().is_empty());
    }

    #[test]
    fn sample_matches_rendered_pixel() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(16, 16)));
        field.initialize();
        field.add_grid_source_at(None, 0, 0, 1000.0, 2);
        field.add_entity_source(1, Vec2::new(14.0, 8.0), 1000.0, 8);
        field.tick(&host(&[(1, Vec2::new(14.0, 8.0))]));

        let sample = field.sample(Vec2::new(8.0, 8.0));
        assert_eq!(field.surface().unwrap().get(8, 8), sample.color());
    }

    #[test]
    fn render_into_leaves_owned_surface_alone() {
        let mut field = Field::new(FieldConfig::new(UVec2::new(8, 8)));
        field.initialize();
        field.add_entity_source(1, Vec2::new(4.0, 4.0), 1000.0, 3);

        let mut external = IndexedSurface::new(8, 8);
        let stats = field.render_into(&mut external);
        assert_eq!(stats.samples, 16);
        assert_eq!(external.get(4, 4), 3);
        assert_eq!(field.surface().unwrap().count_colored(), 0);
    }
}
