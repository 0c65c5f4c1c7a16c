//! Game state module - owns the board, inventory, score and turn phase
//!
//! This module ties together all core components: grid, pieces, generator,
//! placement, slide and turn rules. Every action is atomic: it either
//! applies completely and returns a report, or returns an `ActionError` and
//! leaves the state untouched.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::{ActionError, ConfigError};
use crate::grid::Grid;
use crate::pieces::Piece;
use crate::placement::{can_place, place, PlacedTiles};
use crate::rng::{IdAllocator, PieceGenerator};
use crate::slide::{can_slide, slide, SlideOutcome};
use crate::snapshot::{GameSnapshot, Slots, UndoLedger};
use crate::turn::{find_placement, is_game_over, phase_after_place, phase_after_slide, TurnRules};
use crate::types::{Coord, Direction, Phase, Rotation};

/// What a placement did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceReport {
    pub slot: usize,
    pub piece: Piece,
    pub origin: Coord,
    pub tiles: PlacedTiles,
    /// The piece that refilled the slot
    pub refill: Piece,
    pub phase: Phase,
    pub game_over: bool,
}

/// What a slide did. `outcome.moved == false` means nothing changed apart
/// from a possible forced return to PLACE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideReport {
    pub outcome: SlideOutcome,
    pub phase: Phase,
    pub can_skip_slide: bool,
    /// SLIDE had nothing left to do and was forced back to PLACE
    pub forced_place: bool,
    pub game_over: bool,
}

/// Per-game telemetry for the leaderboard layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub moves: u32,
    pub elapsed_ms: u64,
    pub score: u64,
    pub highest_tile: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    pub(crate) slots: Slots,
    pub(crate) score: u64,
    pub(crate) phase: Phase,
    pub(crate) can_skip_slide: bool,
    pub(crate) undo: UndoLedger,
    /// Position right before the move that ended the game
    pub(crate) revive: Option<GameSnapshot>,
    pub(crate) revive_used: bool,
    pub(crate) game_over: bool,
    /// Placements plus moved slides; never decremented
    pub(crate) move_count: u32,
    pub(crate) elapsed_ms: u64,
    pub(crate) ids: IdAllocator,
    pub(crate) generator: PieceGenerator,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid =
            Grid::new(config.grid_size).map_err(|_| ConfigError::UnsupportedGridSize(config.grid_size))?;

        let mut ids = IdAllocator::new();
        let mut generator = PieceGenerator::new(seed, config.base_value);
        let slots: Slots = std::array::from_fn(|_| Some(generator.generate(&mut ids)));

        debug!(size = config.grid_size, seed, "new game");

        Ok(Self {
            config,
            grid,
            slots,
            score: 0,
            phase: Phase::Place,
            can_skip_slide: false,
            undo: UndoLedger::new(config.initial_undos, config.max_undos),
            revive: None,
            revive_used: false,
            game_over: false,
            move_count: 0,
            elapsed_ms: 0,
            ids,
            generator,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn slot(&self, slot: usize) -> Option<&Piece> {
        self.slots.get(slot).and_then(|p| p.as_ref())
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn can_skip_slide(&self) -> bool {
        self.can_skip_slide
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn undo_remaining(&self) -> u8 {
        self.undo.remaining()
    }

    pub fn can_undo(&self) -> bool {
        !self.game_over && self.undo.can_undo()
    }

    pub fn revive_used(&self) -> bool {
        self.revive_used
    }

    pub fn can_revive(&self) -> bool {
        self.game_over && !self.revive_used && self.revive.is_some()
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            moves: self.move_count,
            elapsed_ms: self.elapsed_ms,
            score: self.score,
            highest_tile: self.grid.highest_value(),
        }
    }

    fn rules(&self) -> TurnRules {
        TurnRules {
            allow_skip_slide: self.config.allow_skip_slide,
        }
    }

    /// Deep copy of everything an undo restores
    pub fn capture(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.clone(),
            slots: self.slots,
            score: self.score,
            phase: self.phase,
            can_skip_slide: self.can_skip_slide,
        }
    }

    fn restore(&mut self, snapshot: GameSnapshot) {
        self.grid = snapshot.grid;
        self.slots = snapshot.slots;
        self.score = snapshot.score;
        self.phase = snapshot.phase;
        self.can_skip_slide = snapshot.can_skip_slide;
    }

    fn ensure_playing(&self) -> Result<(), ActionError> {
        if self.game_over {
            return Err(ActionError::GameOver);
        }
        Ok(())
    }

    fn ensure_phase(&self, expected: Phase) -> Result<(), ActionError> {
        if self.phase != expected {
            return Err(ActionError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn piece_in(&self, slot: usize) -> Result<Piece, ActionError> {
        match self.slots.get(slot) {
            None => Err(ActionError::SlotOutOfRange(slot)),
            Some(None) => Err(ActionError::EmptySlot(slot)),
            Some(Some(piece)) => Ok(*piece),
        }
    }

    /// End the game if PLACE has no legal placement. `before` becomes the
    /// revive point.
    fn check_game_over(&mut self, before: GameSnapshot) {
        if self.phase != Phase::Place || !is_game_over(&self.grid, &self.slots) {
            return;
        }
        self.game_over = true;
        if !self.revive_used {
            self.revive = Some(before);
        }
        info!(
            score = self.score,
            moves = self.move_count,
            "game over: no piece fits"
        );
    }

    /// Place the piece from `slot` with its origin at `(x, y)`
    pub fn try_place(&mut self, slot: usize, x: i8, y: i8) -> Result<PlaceReport, ActionError> {
        self.ensure_playing()?;
        self.ensure_phase(Phase::Place)?;
        let piece = self.piece_in(slot)?;
        if !can_place(&self.grid, piece.cells(), x, y) {
            return Err(ActionError::Blocked { x, y });
        }

        let before = self.capture();
        let placement = place(&self.grid, piece.cells(), piece.value(), x, y, &mut self.ids);
        let refill = self.generator.generate(&mut self.ids);

        self.grid = placement.grid;
        self.slots[slot] = Some(refill);
        self.move_count += 1;
        self.phase = phase_after_place(&self.grid);
        self.can_skip_slide = false;
        self.undo.capture(before.clone());

        debug!(
            slot,
            x,
            y,
            shape = piece.shape().as_str(),
            phase = self.phase.as_str(),
            "placed piece"
        );

        self.check_game_over(before);

        Ok(PlaceReport {
            slot,
            piece,
            origin: (x, y),
            tiles: placement.tiles,
            refill,
            phase: self.phase,
            game_over: self.game_over,
        })
    }

    /// Rotate the piece resting in `slot` one quarter turn
    pub fn try_rotate(&mut self, slot: usize) -> Result<Piece, ActionError> {
        self.ensure_playing()?;
        self.piece_in(slot)?;
        let piece = self.slots[slot]
            .as_mut()
            .ok_or(ActionError::EmptySlot(slot))?;
        piece.rotate();
        Ok(*piece)
    }

    /// Slide the board. A slide that moves nothing consumes no turn.
    pub fn try_slide(&mut self, direction: Direction) -> Result<SlideReport, ActionError> {
        self.ensure_playing()?;
        self.ensure_phase(Phase::Slide)?;

        let outcome = slide(&self.grid, direction);

        if !outcome.moved {
            let forced_place = !self.grid.has_mobility();
            if forced_place {
                let before = self.capture();
                self.phase = Phase::Place;
                self.can_skip_slide = false;
                debug!("slide phase stuck, returning to place");
                self.check_game_over(before);
            }
            return Ok(SlideReport {
                outcome,
                phase: self.phase,
                can_skip_slide: self.can_skip_slide,
                forced_place,
                game_over: self.game_over,
            });
        }

        let before = self.capture();
        let transition = phase_after_slide(&outcome, self.rules());

        self.grid = outcome.grid.clone();
        self.score += outcome.score;
        self.move_count += 1;
        self.phase = transition.phase;
        self.can_skip_slide = transition.can_skip_slide;
        self.undo.capture(before.clone());

        debug!(
            direction = direction.as_str(),
            score = outcome.score,
            merges = outcome.merges.len(),
            phase = self.phase.as_str(),
            "slid board"
        );

        self.check_game_over(before);

        Ok(SlideReport {
            forced_place: outcome.score > 0 && self.phase == Phase::Place,
            outcome,
            phase: self.phase,
            can_skip_slide: self.can_skip_slide,
            game_over: self.game_over,
        })
    }

    /// Leave SLIDE after a scoring slide, when the rule variant allows it
    pub fn try_skip_slide(&mut self) -> Result<Phase, ActionError> {
        self.ensure_playing()?;
        self.ensure_phase(Phase::Slide)?;
        if !self.can_skip_slide {
            return Err(ActionError::SkipNotAllowed);
        }

        let before = self.capture();
        self.phase = Phase::Place;
        self.can_skip_slide = false;
        debug!("skipped remaining slides");
        self.check_game_over(before);
        Ok(self.phase)
    }

    /// Restore the position before the last placement or slide
    pub fn try_undo(&mut self) -> Result<Phase, ActionError> {
        self.ensure_playing()?;
        if !self.undo.has_snapshot() {
            return Err(ActionError::NoSnapshot);
        }
        let snapshot = self.undo.take().ok_or(ActionError::NoUndosLeft)?;
        self.restore(snapshot);
        info!(remaining = self.undo.remaining(), "undo");
        Ok(self.phase)
    }

    /// Restore the position before the move that ended the game. Once per game;
    /// does not spend undo uses.
    pub fn try_revive(&mut self) -> Result<Phase, ActionError> {
        if !self.can_revive() {
            return Err(ActionError::ReviveUnavailable);
        }
        let snapshot = self.revive.take().ok_or(ActionError::ReviveUnavailable)?;
        self.restore(snapshot);
        self.game_over = false;
        self.revive_used = true;
        self.undo.clear();
        info!(score = self.score, "revived");
        Ok(self.phase)
    }

    /// Add undo uses from an external reward. Returns the new count.
    pub fn grant_undos(&mut self, uses: u8) -> u8 {
        self.undo.grant(uses)
    }

    /// Accumulate caller-measured play time. Stops once the game is over.
    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        if !self.game_over {
            self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        }
    }

    /// Any legal placement for the current inventory, as `(slot, rotation, origin)`
    pub fn hint(&self) -> Option<(usize, Rotation, Coord)> {
        if self.game_over || self.phase != Phase::Place {
            return None;
        }
        find_placement(&self.grid, &self.slots)
    }

    /// Directions that would change the board
    pub fn legal_slides(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&d| can_slide(&self.grid, d))
    }
}
