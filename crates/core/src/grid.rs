//! Grid module - the square board of nullable tiles
//!
//! Cells are stored in a flat row-major vector (`y * size + x`). Coordinates
//! are `(x, y)` with `x` the column and `y` the row, both in `0..size`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::rng::IdAllocator;
use crate::types::{Coord, TileId, MAX_TILE_VALUE, SUPPORTED_GRID_SIZES};

/// A board-square occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
}

impl Tile {
    pub fn new(id: TileId, value: u32) -> Self {
        Self { id, value }
    }

    /// Value after merging with an equal neighbour, `None` at the value cap
    pub fn merged_value(&self) -> Option<u32> {
        self.value
            .checked_mul(2)
            .filter(|&value| value <= MAX_TILE_VALUE)
    }

    /// Whether `other` would merge into this tile during a slide
    pub fn merges_with(&self, other: &Tile) -> bool {
        self.value == other.value && self.merged_value().is_some()
    }
}

/// A cell on the board: `None` when empty
pub type Cell = Option<Tile>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u8,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty board
    pub fn new(size: u8) -> Result<Self, GridError> {
        if !SUPPORTED_GRID_SIZES.contains(&size) {
            return Err(GridError::UnsupportedSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size as usize * size as usize],
        })
    }

    /// Build from row-major cells, validating size, values and id uniqueness
    pub fn from_cells(size: u8, cells: Vec<Cell>) -> Result<Self, GridError> {
        let mut grid = Self::new(size)?;
        if cells.len() != grid.cells.len() {
            return Err(GridError::CellCount {
                expected: grid.cells.len(),
                actual: cells.len(),
            });
        }
        grid.cells = cells;
        grid.validate()?;
        Ok(grid)
    }

    /// Build from row-major values where 0 means empty. Tiles get fresh ids in
    /// reading order.
    pub fn from_values(size: u8, values: &[u32], ids: &mut IdAllocator) -> Result<Self, GridError> {
        let cells = values
            .iter()
            .map(|&value| (value != 0).then(|| Tile::new(ids.next_tile_id(), value)))
            .collect();
        Self::from_cells(size, cells)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.size as usize) + (x as usize))
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_vacant(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || y < 0 || x >= self.size as i8 || y >= self.size as i8
    }

    /// Row-major cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Occupied cells with their positions, in reading order
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let size = self.size as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.map(|tile| (((idx % size) as i8, (idx / size) as i8), tile))
        })
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.tile_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Row-major values with 0 for empty cells
    pub fn values(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |t| t.value))
            .collect()
    }

    /// Position of a tile by id
    pub fn find(&self, id: TileId) -> Option<Coord> {
        self.tiles().find(|(_, t)| t.id == id).map(|(pos, _)| pos)
    }

    /// Largest tile id on the board
    pub fn max_tile_id(&self) -> Option<u32> {
        self.tiles().map(|(_, t)| t.id.0).max()
    }

    pub fn highest_value(&self) -> u32 {
        self.tiles().map(|(_, t)| t.value).max().unwrap_or(0)
    }

    /// Whether any slide direction could change the board.
    ///
    /// True when the board holds a tile and either has an empty cell or two
    /// orthogonal neighbours share a value. An empty board cannot move.
    pub fn has_mobility(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.cells.iter().any(|c| c.is_none()) {
            return true;
        }
        self.has_adjacent_pair()
    }

    fn has_adjacent_pair(&self) -> bool {
        let size = self.size as i8;
        for y in 0..size {
            for x in 0..size {
                let Some(Some(tile)) = self.get(x, y) else {
                    continue;
                };
                let same = |nx: i8, ny: i8| {
                    matches!(self.get(nx, ny), Some(Some(other)) if tile.merges_with(&other))
                };
                if same(x + 1, y) || same(x, y + 1) {
                    return true;
                }
            }
        }
        false
    }

    /// Check every tile holds a power of two no larger than the value cap
    /// and every id is unique
    pub fn validate(&self) -> Result<(), GridError> {
        let mut seen = HashSet::with_capacity(self.cells.len());
        for ((x, y), tile) in self.tiles() {
            if tile.value > MAX_TILE_VALUE {
                return Err(GridError::ValueOverCap {
                    x,
                    y,
                    value: tile.value,
                });
            }
            if !tile.value.is_power_of_two() {
                return Err(GridError::InvalidValue {
                    x,
                    y,
                    value: tile.value,
                });
            }
            if !seen.insert(tile.id) {
                return Err(GridError::DuplicateId(tile.id.0));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size as usize) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(tile) => format!("{:>4}", tile.value),
                    None => "   .".to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
