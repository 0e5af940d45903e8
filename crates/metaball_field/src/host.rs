//! Host collaborator traits.
//!
//! The field never owns game objects. It reads positions and wall flags through these traits:
//! - Resolve tracked entity positions by implementing [`EntityHost`].
//! - Expose a tile map by implementing [`TileGrid`], or use the in-memory [`WallGrid`].
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec2;

use crate::error::{Error, Result};

/// Source of current positions for host entities.
pub trait EntityHost {
    /// Identity of a host entity. Sources are matched against it by equality.
    type Entity: Copy + Eq + Debug;

    /// Current world position of `entity`, or `None` if the entity no longer exists.
    fn entity_position(&self, entity: Self::Entity) -> Option<Vec2>;
}

impl<K> EntityHost for HashMap<K, Vec2>
where
    K: Copy + Eq + Hash + Debug,
{
    type Entity = K;

    fn entity_position(&self, entity: K) -> Option<Vec2> {
        self.get(&entity).copied()
    }
}

/// A tile map with uniform square cells.
pub trait TileGrid {
    /// Width of one cell in world units.
    fn cell_size(&self) -> f32;

    /// Whether the cell at (`col`, `row`) is a wall. Cells outside the map are not walls.
    fn is_wall(&self, col: i32, row: i32) -> bool;
}

/// Row-major boolean wall map.
#[derive(Clone, Debug, PartialEq)]
pub struct WallGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    walls: Vec<bool>,
}

impl WallGrid {
    /// Creates an empty grid with no walls.
    pub fn new(cell_size: f32, cols: usize, rows: usize) -> Self {
        Self {
            cell_size,
            cols,
            rows,
            walls: vec![false; cols * rows],
        }
    }

    /// Parses a grid from ASCII rows where `#` marks a wall.
    pub fn from_ascii<S: AsRef<str>>(cell_size: f32, rows: &[S]) -> Result<Self> {
        if cell_size <= 0.0 {
            return Err(Error::InvalidGrid("cell_size must be > 0".into()));
        }
        let cols = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut walls = Vec::with_capacity(cols * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != cols {
                return Err(Error::InvalidGrid(format!(
                    "row {i} has {} cells, expected {cols}",
                    row.chars().count()
                )));
            }
            walls.extend(row.chars().map(|c| c == '#'));
        }
        Ok(Self {
            cell_size,
            cols,
            rows: rows.len(),
            walls,
        })
    }

    /// Grid size as `(cols, rows)`.
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Marks or clears a wall. Out-of-bounds cells are ignored.
    pub fn set_wall(&mut self, col: usize, row: usize, wall: bool) {
        if col < self.cols && row < self.rows {
            self.walls[row * self.cols + col] = wall;
        }
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }
}

impl TileGrid for WallGrid {
    fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn is_wall(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return false;
        }
        self.walls[row as usize * self.cols + col as usize]
    }
}
