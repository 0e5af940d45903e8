#![forbid(unsafe_code)]
//! metaball_field: CPU metaball fields rendered into indexed-color pixel surfaces.
//!
//! Modules:
//! - source: entity-tracked and grid-fixed point sources
//! - host: traits for the host's entities and tile grid, plus an in-memory wall grid
//! - evaluator: per-sample influence and color aggregation
//! - raster: block rasterizer and indexed surfaces
//! - field: the [`field::MetaballField`] context driven once per frame
//! - palette: palette index to RGBA conversion
//! - events: frame observers
//!
//! For examples, see the `metaball_field_examples` crate.
pub mod config;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod field;
pub mod host;
pub mod palette;
pub mod raster;
pub mod source;

/// Convenient re-exports for common types. Import with `use metaball_field::prelude::*;`.
pub mod prelude {
    pub use crate::config::FieldConfig;
    pub use crate::error::{Error, Result};
    pub use crate::evaluator::{evaluate, Evaluator, FieldSample};
    pub use crate::events::{EventSink, FieldEvent, FnSink, VecSink};
    pub use crate::field::{FrameStats, MetaballField};
    pub use crate::host::{EntityHost, TileGrid, WallGrid};
    pub use crate::palette::Palette;
    pub use crate::raster::{rasterize, IndexedSurface, PixelSurface, RasterStats};
    pub use crate::source::{
        EntitySource, GridSource, PointSource, SourceRegistry, DEFAULT_COLOR, DEFAULT_STRENGTH,
    };
}
