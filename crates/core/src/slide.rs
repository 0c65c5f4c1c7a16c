//! Slide module - compaction with pairwise merging in one of four directions
//!
//! The board is cut into independent lines: rows for Left/Right, columns for
//! Up/Down. Right and Down read their lines back to front so a single
//! routine, which always compacts toward index 0, handles every direction.
//! Line-local indices are mapped back to board coordinates when reporting.
//!
//! Merge rules for one line:
//! - equal neighbours (after skipping gaps) merge into one tile with double
//!   the value, keeping the id of the tile nearer the front;
//! - a tile merges at most once per slide, so `[2, 2, 2, 2]` becomes
//!   `[4, 4, _, _]`, never `[8, _, _, _]`;
//! - the line scores the sum of every doubled value;
//! - tiles already at `MAX_TILE_VALUE` stay apart.

use arrayvec::ArrayVec;

use crate::grid::{Cell, Grid, Tile};
use crate::types::{Coord, Direction, TileId, MAX_GRID_SIZE};

/// One row or column in processing order
pub type Line = ArrayVec<Cell, MAX_GRID_SIZE>;

/// A surviving tile that changed index within its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMove {
    pub id: TileId,
    pub from: usize,
    pub to: usize,
}

/// A pairwise merge within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMerge {
    pub survivor: TileId,
    pub absorbed: TileId,
    pub survivor_from: usize,
    pub absorbed_from: usize,
    pub to: usize,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineSlide {
    pub cells: Line,
    pub score: u64,
    pub changed: bool,
    pub moves: ArrayVec<LineMove, MAX_GRID_SIZE>,
    pub merges: ArrayVec<LineMerge, MAX_GRID_SIZE>,
}

/// Compact one line toward index 0, merging equal neighbours once
pub fn slide_line(line: &[Cell]) -> LineSlide {
    let tiles: ArrayVec<(usize, Tile), MAX_GRID_SIZE> = line
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell.map(|tile| (idx, tile)))
        .collect();

    let mut out = LineSlide::default();
    let mut i = 0;
    while i < tiles.len() {
        let (from, current) = tiles[i];
        let to = out.cells.len();

        let merge = tiles
            .get(i + 1)
            .filter(|(_, next)| next.value == current.value)
            .and_then(|&(next_from, next)| current.merged_value().map(|v| (next_from, next, v)));

        match merge {
            Some((next_from, next, value)) => {
                out.cells.push(Some(Tile::new(current.id, value)));
                out.score += u64::from(value);
                out.merges.push(LineMerge {
                    survivor: current.id,
                    absorbed: next.id,
                    survivor_from: from,
                    absorbed_from: next_from,
                    to,
                    value,
                });
                i += 2;
            }
            None => {
                out.cells.push(Some(current));
                i += 1;
            }
        }

        if from != to {
            out.moves.push(LineMove {
                id: current.id,
                from,
                to,
            });
        }
    }

    while out.cells.len() < line.len() {
        out.cells.push(None);
    }

    out.changed = line
        .iter()
        .zip(out.cells.iter())
        .any(|(before, after)| before.map(|t| t.id) != after.map(|t| t.id));

    out
}

/// Board position of index `i` along `line` when sliding in `direction`
pub fn line_position(size: u8, direction: Direction, line: usize, i: usize) -> Coord {
    let last = size as usize - 1;
    let along = if direction.is_reversed() { last - i } else { i };
    let (x, y) = if direction.is_horizontal() {
        (along, line)
    } else {
        (line, along)
    };
    (x as i8, y as i8)
}

/// Read `line` in processing order for `direction`
pub fn read_line(grid: &Grid, direction: Direction, line: usize) -> Line {
    (0..grid.size() as usize)
        .map(|i| {
            let (x, y) = line_position(grid.size(), direction, line, i);
            grid.get(x, y).flatten()
        })
        .collect()
}

/// A surviving tile that changed square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    pub id: TileId,
    pub from: Coord,
    pub to: Coord,
}

/// Two tiles that became one. `survivor` keeps its id and takes `value`;
/// `absorbed` leaves the board after travelling to `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEvent {
    pub survivor: TileId,
    pub absorbed: TileId,
    pub survivor_from: Coord,
    pub absorbed_from: Coord,
    pub at: Coord,
    pub value: u32,
}

/// Everything a slide produced. When `moved` is false, `grid` equals the
/// input and the slide must be treated as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOutcome {
    pub direction: Direction,
    pub grid: Grid,
    pub score: u64,
    pub moved: bool,
    pub moves: Vec<TileMove>,
    pub merges: Vec<MergeEvent>,
}

impl SlideOutcome {
    /// `(survivor, new value)` for every merged tile
    pub fn merged_tile_deltas(&self) -> impl Iterator<Item = (TileId, u32)> + '_ {
        self.merges.iter().map(|m| (m.survivor, m.value))
    }

    /// Ids that left the board
    pub fn absorbed(&self) -> impl Iterator<Item = TileId> + '_ {
        self.merges.iter().map(|m| m.absorbed)
    }
}

/// Slide the whole board. The input grid is not modified.
pub fn slide(grid: &Grid, direction: Direction) -> SlideOutcome {
    let size = grid.size();
    let mut out = SlideOutcome {
        direction,
        grid: grid.clone(),
        score: 0,
        moved: false,
        moves: Vec::new(),
        merges: Vec::new(),
    };

    for line in 0..size as usize {
        let result = slide_line(&read_line(grid, direction, line));
        if !result.changed {
            continue;
        }

        let at = |i: usize| line_position(size, direction, line, i);

        out.moved = true;
        out.score += result.score;
        for (i, cell) in result.cells.iter().enumerate() {
            let (x, y) = at(i);
            out.grid.set(x, y, *cell);
        }
        out.moves.extend(result.moves.iter().map(|m| TileMove {
            id: m.id,
            from: at(m.from),
            to: at(m.to),
        }));
        out.merges.extend(result.merges.iter().map(|m| MergeEvent {
            survivor: m.survivor,
            absorbed: m.absorbed,
            survivor_from: at(m.survivor_from),
            absorbed_from: at(m.absorbed_from),
            at: at(m.to),
            value: m.value,
        }));
    }

    out
}

/// Whether sliding in `direction` would change the board
pub fn can_slide(grid: &Grid, direction: Direction) -> bool {
    (0..grid.size() as usize).any(|line| slide_line(&read_line(grid, direction, line)).changed)
}
