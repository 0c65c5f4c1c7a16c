//! Save records - the plain data needed to resume a game
//!
//! `GameState::to_saved` produces a `SavedGame`; `GameState::rehydrate` turns
//! one back into a running game. Rehydration is more than deserialization:
//! piece cells are re-derived from `(shape, rotation)` (stored cells are
//! informational only), every grid and slot is validated, and the id
//! allocator and piece generator are rebuilt so the resumed game continues
//! exactly where the saved one stopped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::PersistError;
use crate::game_state::GameState;
use crate::grid::{Cell, Grid};
use crate::pieces::Piece;
use crate::rng::{IdAllocator, PieceGenerator};
use crate::snapshot::{GameSnapshot, Slots, UndoLedger};
use crate::types::{Coord, Phase, PieceId, Rotation, ShapeType, MAX_TILE_VALUE, SLOT_COUNT};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPiece {
    pub id: u32,
    pub shape: ShapeType,
    /// Quarter turns, 0..=3
    pub rotation: u8,
    pub value: u32,
    /// Written for consumers that render from the save; ignored on load
    #[serde(default)]
    pub cells: Vec<Coord>,
}

impl From<&Piece> for SavedPiece {
    fn from(piece: &Piece) -> Self {
        Self {
            id: piece.id().0,
            shape: piece.shape(),
            rotation: piece.rotation().quarter_turns(),
            value: piece.value(),
            cells: piece.cells().to_vec(),
        }
    }
}

impl SavedPiece {
    fn rehydrate(&self) -> Result<Piece, PersistError> {
        if self.rotation > 3 {
            return Err(PersistError::InvalidRotation(self.rotation));
        }
        if !self.value.is_power_of_two() || self.value > MAX_TILE_VALUE {
            return Err(PersistError::InvalidPieceValue(self.value));
        }
        Ok(Piece::new(
            PieceId(self.id),
            self.shape,
            Rotation::from_quarter_turns(i32::from(self.rotation)),
            self.value,
        ))
    }
}

/// Board, inventory and turn position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPosition {
    /// Row-major cells
    pub cells: Vec<Cell>,
    pub slots: Vec<Option<SavedPiece>>,
    pub score: u64,
    pub phase: Phase,
    #[serde(default)]
    pub can_skip_slide: bool,
}

impl From<&GameSnapshot> for SavedPosition {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            cells: snapshot.grid.cells().to_vec(),
            slots: snapshot
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(SavedPiece::from))
                .collect(),
            score: snapshot.score,
            phase: snapshot.phase,
            can_skip_slide: snapshot.can_skip_slide,
        }
    }
}

impl SavedPosition {
    fn rehydrate(&self, grid_size: u8) -> Result<GameSnapshot, PersistError> {
        let grid = Grid::from_cells(grid_size, self.cells.clone())?;

        if self.slots.len() != SLOT_COUNT {
            return Err(PersistError::SlotCount {
                expected: SLOT_COUNT,
                actual: self.slots.len(),
            });
        }
        let mut slots: Slots = [None; SLOT_COUNT];
        let mut seen = HashSet::new();
        for (slot, saved) in slots.iter_mut().zip(&self.slots) {
            if let Some(saved) = saved {
                if !seen.insert(saved.id) {
                    return Err(PersistError::DuplicatePieceId(saved.id));
                }
                *slot = Some(saved.rehydrate()?);
            }
        }

        Ok(GameSnapshot {
            grid,
            slots,
            score: self.score,
            phase: self.phase,
            can_skip_slide: self.can_skip_slide,
        })
    }
}

/// Everything needed to resume a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub config: GameConfig,
    pub seed: u64,
    pub position: SavedPosition,
    #[serde(default)]
    pub undo: Option<SavedPosition>,
    pub undo_remaining: u8,
    #[serde(default)]
    pub revive: Option<SavedPosition>,
    #[serde(default)]
    pub revive_used: bool,
    #[serde(default)]
    pub game_over: bool,
    pub move_count: u32,
    pub elapsed_ms: u64,
    pub next_tile_id: u32,
    pub next_piece_id: u32,
}

fn highest_ids(snapshot: &GameSnapshot) -> (u32, u32) {
    let tile = snapshot.grid.max_tile_id().unwrap_or(0);
    let piece = snapshot
        .slots
        .iter()
        .flatten()
        .map(|p| p.id().0)
        .max()
        .unwrap_or(0);
    (tile, piece)
}

impl GameState {
    /// Plain record of the full mutable state
    pub fn to_saved(&self) -> SavedGame {
        SavedGame {
            version: SAVE_VERSION,
            config: self.config,
            seed: self.generator.seed(),
            position: SavedPosition::from(&self.capture()),
            undo: self.undo.snapshot().map(SavedPosition::from),
            undo_remaining: self.undo.remaining(),
            revive: self.revive.as_ref().map(SavedPosition::from),
            revive_used: self.revive_used,
            game_over: self.game_over,
            move_count: self.move_count,
            elapsed_ms: self.elapsed_ms,
            next_tile_id: self.ids.peek_tile(),
            next_piece_id: self.ids.peek_piece(),
        }
    }

    /// Validate a saved record and rebuild a running game from it
    pub fn rehydrate(saved: &SavedGame) -> Result<Self, PersistError> {
        if saved.version != SAVE_VERSION {
            return Err(PersistError::UnsupportedVersion(saved.version));
        }
        saved.config.validate()?;
        let size = saved.config.grid_size;

        let current = saved.position.rehydrate(size)?;
        let undo = saved
            .undo
            .as_ref()
            .map(|p| p.rehydrate(size))
            .transpose()?;
        let revive = saved
            .revive
            .as_ref()
            .map(|p| p.rehydrate(size))
            .transpose()?;

        if saved.undo_remaining > saved.config.max_undos {
            return Err(PersistError::UndosOverCap {
                remaining: saved.undo_remaining,
                max: saved.config.max_undos,
            });
        }

        for snapshot in std::iter::once(&current).chain(&undo).chain(&revive) {
            let (tile, piece) = highest_ids(snapshot);
            if tile >= saved.next_tile_id || piece >= saved.next_piece_id {
                return Err(PersistError::StaleIdAllocator);
            }
        }

        // Three opening draws plus at most one refill per counted move.
        let drawn = saved.next_piece_id.saturating_sub(1);
        let max_drawn = SLOT_COUNT as u64 + u64::from(saved.move_count);
        if u64::from(drawn) > max_drawn {
            return Err(PersistError::PieceCounterAhead {
                drawn,
                max: max_drawn,
            });
        }

        let generator = PieceGenerator::resume(saved.seed, saved.config.base_value, drawn);

        Ok(Self {
            config: saved.config,
            grid: current.grid,
            slots: current.slots,
            score: current.score,
            phase: current.phase,
            can_skip_slide: current.can_skip_slide,
            undo: UndoLedger::with_snapshot(undo, saved.undo_remaining, saved.config.max_undos),
            revive,
            revive_used: saved.revive_used,
            game_over: saved.game_over,
            move_count: saved.move_count,
            elapsed_ms: saved.elapsed_ms,
            ids: IdAllocator::from_counters(saved.next_tile_id, saved.next_piece_id),
            generator,
        })
    }
}
