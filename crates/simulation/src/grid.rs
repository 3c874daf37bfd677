use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::CELL_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Regolith,
    Crater,
    Pad,
}

impl CellType {
    /// Flat regolith is the only ground that accepts construction.
    pub fn is_buildable(self) -> bool {
        matches!(self, CellType::Regolith)
    }
}

/// Structural role of a pad cell within its 3x3 formation. The name is the
/// compass direction from the formation's anchor toward this cell, so the
/// anchor lies in the opposite direction. Grid axes: +x is east, +y is south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PadRole {
    #[default]
    None,
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl PadRole {
    /// Offset of this cell from the formation's anchor. `None` maps to
    /// (0, 0) so teardown of a role-less cell resolves to its own position.
    pub fn offset(self) -> (i32, i32) {
        match self {
            PadRole::None | PadRole::Center => (0, 0),
            PadRole::North => (0, -1),
            PadRole::NorthEast => (1, -1),
            PadRole::East => (1, 0),
            PadRole::SouthEast => (1, 1),
            PadRole::South => (0, 1),
            PadRole::SouthWest => (-1, 1),
            PadRole::West => (-1, 0),
            PadRole::NorthWest => (-1, -1),
        }
    }

    /// Role for a cell at `(dx, dy)` relative to the anchor. Total over
    /// the 3x3 window; any other offset is a caller bug.
    pub fn for_offset(dx: i32, dy: i32) -> Self {
        match (dx, dy) {
            (0, 0) => PadRole::Center,
            (0, -1) => PadRole::North,
            (1, -1) => PadRole::NorthEast,
            (1, 0) => PadRole::East,
            (1, 1) => PadRole::SouthEast,
            (0, 1) => PadRole::South,
            (-1, 1) => PadRole::SouthWest,
            (-1, 0) => PadRole::West,
            (-1, -1) => PadRole::NorthWest,
            _ => panic!("offset ({dx}, {dy}) is outside the 3x3 pad window"),
        }
    }

    pub fn is_assigned(self) -> bool {
        !matches!(self, PadRole::None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub elevation: f32,
    pub cell_type: CellType,
    pub pad_role: PadRole,
    pub pad_entity: Option<Entity>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            cell_type: CellType::Regolith,
            pad_role: PadRole::None,
            pad_entity: None,
        }
    }
}

#[derive(Resource)]
pub struct WorldGrid {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    pub fn world_to_grid(world_x: f32, world_y: f32) -> (i32, i32) {
        let gx = (world_x / CELL_SIZE).floor() as i32;
        let gy = (world_y / CELL_SIZE).floor() as i32;
        (gx, gy)
    }

    pub fn grid_to_world(gx: usize, gy: usize) -> (f32, f32) {
        let wx = gx as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        let wy = gy as f32 * CELL_SIZE + CELL_SIZE * 0.5;
        (wx, wy)
    }
}
