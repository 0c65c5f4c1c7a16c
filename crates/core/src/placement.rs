//! Placement - validating and writing piece cells onto the grid
//!
//! Placement is all-or-nothing: `can_place` accepts a footprint only when
//! every cell is in bounds and vacant, and `place` writes every cell or none.
//! Placed cells never merge with neighbours; merging happens only in a slide.

use arrayvec::ArrayVec;

use crate::grid::{Grid, Tile};
use crate::pieces::Piece;
use crate::rng::IdAllocator;
use crate::types::{Coord, Rotation, TileId};

/// Tiles created by one placement
pub type PlacedTiles = ArrayVec<(Coord, Tile), 4>;

/// Result of writing a piece onto a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub grid: Grid,
    pub tiles: PlacedTiles,
}

/// Check whether every cell lands in bounds on an empty square
pub fn can_place(grid: &Grid, cells: &[Coord], origin_x: i8, origin_y: i8) -> bool {
    cells.iter().all(|&(dx, dy)| {
        match (origin_x.checked_add(dx), origin_y.checked_add(dy)) {
            (Some(x), Some(y)) => grid.is_vacant(x, y),
            _ => false,
        }
    })
}

/// Write one fresh tile per cell into a copy of `grid`.
///
/// The caller must have checked `can_place` first.
///
/// # Panics
///
/// Panics if a target cell is out of bounds or occupied.
pub fn place(
    grid: &Grid,
    cells: &[Coord],
    value: u32,
    origin_x: i8,
    origin_y: i8,
    ids: &mut IdAllocator,
) -> Placement {
    assert!(
        can_place(grid, cells, origin_x, origin_y),
        "place called with a footprint that does not fit at ({}, {})",
        origin_x,
        origin_y
    );

    let mut next = grid.clone();
    let mut tiles = PlacedTiles::new();
    for &(dx, dy) in cells {
        let pos = (origin_x + dx, origin_y + dy);
        let tile = Tile::new(fresh_tile_id(grid, ids), value);
        next.set(pos.0, pos.1, Some(tile));
        tiles.push((pos, tile));
    }

    Placement { grid: next, tiles }
}

fn fresh_tile_id(grid: &Grid, ids: &mut IdAllocator) -> TileId {
    let id = ids.next_tile_id();
    assert!(
        grid.find(id).is_none(),
        "tile id {} already on the board",
        id
    );
    id
}

/// Whether a piece fits anywhere on the grid in any rotation.
///
/// Origins range over every offset that could bring a cell into bounds, so
/// shapes with negative offsets are covered.
pub fn fits_anywhere(grid: &Grid, piece: &Piece) -> bool {
    Rotation::ALL.iter().any(|&rotation| {
        let rotated = piece.rotated_to(rotation);
        first_fit(grid, rotated.cells()).is_some()
    })
}

/// First origin (reading order) where the cells fit
pub fn first_fit(grid: &Grid, cells: &[Coord]) -> Option<Coord> {
    let size = grid.size() as i8;
    let min_dx = cells.iter().map(|c| c.0).min().unwrap_or(0);
    let max_dx = cells.iter().map(|c| c.0).max().unwrap_or(0);
    let min_dy = cells.iter().map(|c| c.1).min().unwrap_or(0);
    let max_dy = cells.iter().map(|c| c.1).max().unwrap_or(0);

    for y in -min_dy..size - max_dy {
        for x in -min_dx..size - max_dx {
            if can_place(grid, cells, x, y) {
                return Some((x, y));
            }
        }
    }
    None
}
