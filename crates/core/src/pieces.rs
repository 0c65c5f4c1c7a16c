//! Pieces module - shape catalog and quarter-turn rotation
//!
//! Each shape is stored once, at rotation 0. Other rotations are derived by
//! applying `(x, y) -> (-y, x)` once per quarter turn, so the catalog cannot
//! drift out of sync with itself. O is rotation-invariant.

use crate::types::{Coord, PieceId, Rotation, ShapeType};

/// Shape of a piece - 4 cell offsets from the piece origin
pub type PieceShape = [Coord; 4];

/// Canonical offsets at rotation 0
fn canonical(shape: ShapeType) -> PieceShape {
    match shape {
        ShapeType::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        ShapeType::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        ShapeType::T => [(-1, 0), (0, 0), (1, 0), (0, 1)],
        ShapeType::S => [(0, 0), (1, 0), (-1, 1), (0, 1)],
        ShapeType::Z => [(-1, 0), (0, 0), (0, 1), (1, 1)],
        ShapeType::J => [(-1, -1), (-1, 0), (0, 0), (1, 0)],
        ShapeType::L => [(1, -1), (-1, 0), (0, 0), (1, 0)],
    }
}

#[inline]
fn quarter_turn((x, y): Coord) -> Coord {
    (-y, x)
}

/// Get the cell offsets for a shape at a rotation
pub fn get_shape(shape: ShapeType, rotation: Rotation) -> PieceShape {
    let mut cells = canonical(shape);
    if shape == ShapeType::O {
        return cells;
    }
    for _ in 0..rotation.quarter_turns() {
        for cell in &mut cells {
            *cell = quarter_turn(*cell);
        }
    }
    cells
}

/// A placeable piece resting in an inventory slot
///
/// `cells` is always derived from `(shape, rotation)` and is never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    shape: ShapeType,
    rotation: Rotation,
    cells: PieceShape,
    value: u32,
}

impl Piece {
    pub fn new(id: PieceId, shape: ShapeType, rotation: Rotation, value: u32) -> Self {
        Self {
            id,
            shape,
            rotation,
            cells: get_shape(shape, rotation),
            value,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn shape(&self) -> ShapeType {
        self.shape
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn cells(&self) -> &PieceShape {
        &self.cells
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Rotate one quarter turn in place
    pub fn rotate(&mut self) {
        self.set_rotation(self.rotation.rotate_cw());
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.cells = get_shape(self.shape, rotation);
    }

    /// Copy of this piece at another rotation
    pub fn rotated_to(&self, rotation: Rotation) -> Self {
        let mut piece = *self;
        piece.set_rotation(rotation);
        piece
    }
}
