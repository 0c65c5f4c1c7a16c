//! Session - the embedding surface a UI drives
//!
//! A `Session` owns one `GameState`, an input lock the presentation layer
//! holds while a reveal plays, and the JSON save/load boundary. Every action
//! returns an `ActionOutcome` carrying the committed result together with its
//! reveal schedule.

use anyhow::Context;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use tetromerge_core::{
    ActionError, ConfigError, GameConfig, GameState, GameStats, Piece, SavedGame,
};
use tetromerge_types::{Coord, Direction, Phase, Rotation};

use crate::place::apply_place;
use crate::reveal::RevealSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("input is locked")]
    InputLocked,
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl SessionError {
    pub fn code(self) -> &'static str {
        match self {
            SessionError::InputLocked => "input_locked",
            SessionError::Action(e) => e.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Place,
    Rotate,
    Slide,
    SkipSlide,
    Undo,
    Revive,
}

/// Committed result of one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub phase: Phase,
    pub score: u64,
    /// Negative after an undo or revive that rolled back a scoring move
    pub score_delta: i64,
    pub game_over: bool,
    pub reveal: RevealSchedule,
}

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    input_locked: bool,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::new(config, seed)?))
    }

    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            input_locked: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn lock_input(&mut self) {
        self.input_locked = true;
    }

    pub fn unlock_input(&mut self) {
        self.input_locked = false;
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    /// Score before the action, or `InputLocked`
    fn begin(&self) -> Result<u64, SessionError> {
        if self.input_locked {
            return Err(SessionError::InputLocked);
        }
        Ok(self.state.score())
    }

    fn outcome(&self, kind: ActionKind, score_before: u64, reveal: RevealSchedule) -> ActionOutcome {
        let score = self.state.score();
        ActionOutcome {
            kind,
            phase: self.state.phase(),
            score,
            score_delta: score as i64 - score_before as i64,
            game_over: self.state.game_over(),
            reveal,
        }
    }

    fn refused(kind: ActionKind, err: SessionError) -> SessionError {
        debug!(kind = ?kind, code = err.code(), "action refused");
        err
    }

    #[instrument(skip(self))]
    pub fn try_place(&mut self, slot: usize, x: i8, y: i8) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let report = self
            .state
            .try_place(slot, x, y)
            .map_err(|e| Self::refused(ActionKind::Place, e.into()))?;
        Ok(self.outcome(ActionKind::Place, before, RevealSchedule::for_place(&report)))
    }

    /// Turn the slot's piece to `rotation` and place it, atomically
    #[instrument(skip(self))]
    pub fn try_place_rotated(
        &mut self,
        slot: usize,
        rotation: Rotation,
        x: i8,
        y: i8,
    ) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let report = apply_place(&mut self.state, slot, rotation, x, y)
            .map_err(|e| Self::refused(ActionKind::Place, e.into()))?;
        Ok(self.outcome(ActionKind::Place, before, RevealSchedule::for_place(&report)))
    }

    #[instrument(skip(self))]
    pub fn try_rotate(&mut self, slot: usize) -> Result<Piece, SessionError> {
        self.begin()?;
        self.state
            .try_rotate(slot)
            .map_err(|e| Self::refused(ActionKind::Rotate, e.into()))
    }

    #[instrument(skip(self))]
    pub fn try_slide(&mut self, direction: Direction) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let report = self
            .state
            .try_slide(direction)
            .map_err(|e| Self::refused(ActionKind::Slide, e.into()))?;
        let reveal = RevealSchedule::for_slide(&report, self.state.score());
        Ok(self.outcome(ActionKind::Slide, before, reveal))
    }

    #[instrument(skip(self))]
    pub fn try_skip_slide(&mut self) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let phase = self
            .state
            .try_skip_slide()
            .map_err(|e| Self::refused(ActionKind::SkipSlide, e.into()))?;
        Ok(self.outcome(ActionKind::SkipSlide, before, RevealSchedule::for_restore(phase)))
    }

    #[instrument(skip(self))]
    pub fn try_undo(&mut self) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let phase = self
            .state
            .try_undo()
            .map_err(|e| Self::refused(ActionKind::Undo, e.into()))?;
        Ok(self.outcome(ActionKind::Undo, before, RevealSchedule::for_restore(phase)))
    }

    #[instrument(skip(self))]
    pub fn try_revive(&mut self) -> Result<ActionOutcome, SessionError> {
        let before = self.begin()?;
        let phase = self
            .state
            .try_revive()
            .map_err(|e| Self::refused(ActionKind::Revive, e.into()))?;
        Ok(self.outcome(ActionKind::Revive, before, RevealSchedule::for_restore(phase)))
    }

    /// Reward hook; not subject to the input lock
    pub fn grant_undos(&mut self, uses: u8) -> u8 {
        self.state.grant_undos(uses)
    }

    pub fn advance_clock(&mut self, elapsed_ms: u64) {
        self.state.advance_clock(elapsed_ms);
    }

    pub fn stats(&self) -> GameStats {
        self.state.stats()
    }

    pub fn hint(&self) -> Option<(usize, Rotation, Coord)> {
        self.state.hint()
    }

    pub fn save(&self) -> SavedGame {
        self.state.to_saved()
    }

    pub fn save_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(&self.save()).context("failed to serialize saved game")
    }

    pub fn load_json(json: &str) -> anyhow::Result<Self> {
        let saved: SavedGame = serde_json::from_str(json).context("failed to parse saved game")?;
        let state = GameState::rehydrate(&saved).context("saved game is inconsistent")?;
        Ok(Self::from_state(state))
    }

    /// Resume from `saved` when it loads cleanly, otherwise start a new game
    pub fn resume_or_new(
        saved: Option<&str>,
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if let Some(json) = saved {
            match Self::load_json(json) {
                Ok(session) => return Ok(session),
                Err(err) => warn!("discarding saved game: {err:#}"),
            }
        }
        Self::new(config, seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(GameConfig::default(), 42).unwrap()
    }

    fn place_hint(session: &mut Session) -> ActionOutcome {
        let (slot, rotation, (x, y)) = session.hint().unwrap();
        session.try_place_rotated(slot, rotation, x, y).unwrap()
    }

    #[test]
    fn place_outcome_carries_reveal() {
        let mut session = session();
        let outcome = place_hint(&mut session);
        assert_eq!(outcome.kind, ActionKind::Place);
        assert_eq!(outcome.phase, Phase::Slide);
        assert_eq!(outcome.score_delta, 0);
        assert!(!outcome.reveal.is_empty());
    }

    #[test]
    fn locked_input_refuses_actions() {
        let mut session = session();
        session.lock_input();
        let before = session.save();

        assert_eq!(
            session.try_place(0, 2, 2).unwrap_err(),
            SessionError::InputLocked
        );
        assert_eq!(session.try_rotate(0).unwrap_err(), SessionError::InputLocked);
        assert_eq!(session.try_undo().unwrap_err().code(), "input_locked");
        assert_eq!(session.save(), before);

        session.unlock_input();
        assert!(session.try_rotate(0).is_ok());
    }

    #[test]
    fn grant_ignores_lock() {
        let mut session = session();
        session.lock_input();
        assert_eq!(session.grant_undos(2), 5);
    }

    #[test]
    fn action_errors_keep_their_code() {
        let mut session = session();
        let err = session.try_slide(Direction::Left).unwrap_err();
        assert_eq!(err.code(), "wrong_phase");
    }

    #[test]
    fn undo_reports_negative_delta() {
        let mut session = session();
        place_hint(&mut session);
        let direction = Direction::ALL
            .into_iter()
            .find(|&d| tetromerge_core::slide(session.state().grid(), d).score > 0)
            .unwrap();
        let slid = session.try_slide(direction).unwrap();
        assert!(slid.score_delta > 0);

        let undone = session.try_undo().unwrap();
        assert_eq!(undone.score_delta, -slid.score_delta);
        assert_eq!(undone.score, 0);
    }

    #[test]
    fn json_round_trip() {
        let mut session = session();
        place_hint(&mut session);
        session.advance_clock(750);

        let json = session.save_json().unwrap();
        let loaded = Session::load_json(&json).unwrap();
        assert_eq!(loaded.save(), session.save());
        assert!(!loaded.is_input_locked());
    }

    #[test]
    fn load_reports_context() {
        let err = Session::load_json("{ not json").unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to parse saved game"));
    }

    #[test]
    fn corrupt_save_starts_fresh() {
        let session = Session::resume_or_new(Some("[]"), GameConfig::default(), 9).unwrap();
        assert_eq!(session.state().move_count(), 0);
        assert_eq!(session.state().seed(), 9);

        let mut played = Session::new(GameConfig::default(), 3).unwrap();
        place_hint(&mut played);
        let json = played.save_json().unwrap();
        let resumed = Session::resume_or_new(Some(&json), GameConfig::default(), 9).unwrap();
        assert_eq!(resumed.state().move_count(), 1);
        assert_eq!(resumed.state().seed(), 3);
    }
}
