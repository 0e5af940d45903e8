use bevy::prelude::*;
use metaball_field::prelude::{FrameStats, DEFAULT_COLOR, DEFAULT_STRENGTH};

/// Allocates the field surface and spawns the sprite presenting it. Triggering it again is a no-op.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct InitializeField;

/// [`EntityEvent`] that binds an entity as a metaball following its [`GlobalTransform`].
#[non_exhaustive]
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct AddMetaball {
    /// Entity to follow.
    pub entity: Entity,
    /// Falloff strength, typically in `1..=1000`.
    pub strength: f32,
    /// Palette index.
    pub color: u8,
}

impl AddMetaball {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            strength: DEFAULT_STRENGTH,
            color: DEFAULT_COLOR,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }
}

/// [`EntityEvent`] that unbinds the first metaball following the entity.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct RemoveMetaball {
    /// Entity to stop following.
    pub entity: Entity,
}

/// Adds a metaball at the center of a tile of the [`crate::ActiveTileGrid`].
#[non_exhaustive]
#[derive(Event, Debug, Clone, Copy)]
pub struct AddTileMetaball {
    pub col: i32,
    pub row: i32,
    pub strength: f32,
    pub color: u8,
}

impl AddTileMetaball {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            col,
            row,
            strength: DEFAULT_STRENGTH,
            color: DEFAULT_COLOR,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }
}

/// Adds a metaball for every on-screen wall tile of the [`crate::ActiveTileGrid`].
#[non_exhaustive]
#[derive(Event, Debug, Clone, Copy)]
pub struct AddWallMetaballs {
    pub strength: f32,
    pub color: u8,
}

impl Default for AddWallMetaballs {
    fn default() -> Self {
        Self {
            strength: DEFAULT_STRENGTH,
            color: DEFAULT_COLOR,
        }
    }
}

impl AddWallMetaballs {
    pub fn new(strength: f32, color: u8) -> Self {
        Self { strength, color }
    }
}

/// Removes every tile metaball. Entity metaballs are kept.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClearTileMetaballs;

/// Bevy message written after each rendered frame.
#[derive(Message, Debug, Clone, Copy)]
pub struct FieldFrameMessage {
    pub stats: FrameStats,
}
