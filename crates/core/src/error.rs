//! Error types for engine actions, board construction, config and save data.
//!
//! Every variant is an expected branch of normal play and is reported as a
//! value. Each error carries a stable `code()` for the UI layer.

use thiserror::Error;

use crate::types::Phase;

/// Why a player action was refused. On error the game state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("action requires the {expected:?} phase but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("game is over")]
    GameOver,
    #[error("slot {0} does not exist")]
    SlotOutOfRange(usize),
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("piece does not fit at ({x}, {y})")]
    Blocked { x: i8, y: i8 },
    #[error("nothing to undo")]
    NoSnapshot,
    #[error("no undo uses left")]
    NoUndosLeft,
    #[error("revive is not available")]
    ReviveUnavailable,
    #[error("skipping the slide phase is not allowed")]
    SkipNotAllowed,
}

impl ActionError {
    pub fn code(self) -> &'static str {
        match self {
            ActionError::WrongPhase { .. } => "wrong_phase",
            ActionError::GameOver => "game_over",
            ActionError::SlotOutOfRange(_) | ActionError::EmptySlot(_) => "invalid_slot",
            ActionError::Blocked { .. } => "invalid_place",
            ActionError::NoSnapshot | ActionError::NoUndosLeft => "undo_unavailable",
            ActionError::ReviveUnavailable => "revive_unavailable",
            ActionError::SkipNotAllowed => "skip_unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("unsupported grid size {0}")]
    UnsupportedSize(u8),
    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error("tile value {value} at ({x}, {y}) is not a power of two")]
    InvalidValue { x: i8, y: i8, value: u32 },
    #[error("tile value {value} at ({x}, {y}) exceeds the value cap")]
    ValueOverCap { x: i8, y: i8, value: u32 },
    #[error("tile id {0} appears more than once")]
    DuplicateId(u32),
}

impl GridError {
    pub fn code(&self) -> &'static str {
        match self {
            GridError::UnsupportedSize(_) => "unsupported_size",
            GridError::CellCount { .. } => "cell_count",
            GridError::InvalidValue { .. } => "invalid_value",
            GridError::ValueOverCap { .. } => "value_over_cap",
            GridError::DuplicateId(_) => "duplicate_id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unsupported grid size {0}")]
    UnsupportedGridSize(u8),
    #[error("initial undos {initial} exceed the cap {max}")]
    UndosOverCap { initial: u8, max: u8 },
    #[error("base value {0} is not a power of two")]
    InvalidBaseValue(u32),
    #[error("base value {0} exceeds the tile value cap")]
    BaseValueOverCap(u32),
    #[error("undo cap {max} exceeds the limit {limit}")]
    MaxUndosOverLimit { max: u8, limit: u8 },
}

/// Why a saved game could not be rehydrated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error("expected {expected} slots, got {actual}")]
    SlotCount { expected: usize, actual: usize },
    #[error("rotation {0} is out of range")]
    InvalidRotation(u8),
    #[error("piece value {0} is not a power of two within the value cap")]
    InvalidPieceValue(u32),
    #[error("duplicate piece id {0}")]
    DuplicatePieceId(u32),
    #[error("id allocator is behind an id already in use")]
    StaleIdAllocator,
    #[error("undo uses {remaining} exceed the cap {max}")]
    UndosOverCap { remaining: u8, max: u8 },
    #[error("{drawn} pieces drawn but the move count allows at most {max}")]
    PieceCounterAhead { drawn: u32, max: u64 },
}

impl PersistError {
    pub fn code(&self) -> &'static str {
        match self {
            PersistError::UnsupportedVersion(_) => "unsupported_version",
            PersistError::Config(_) => "invalid_config",
            PersistError::Grid(e) => e.code(),
            PersistError::SlotCount { .. } => "slot_count",
            PersistError::InvalidRotation(_) => "invalid_rotation",
            PersistError::InvalidPieceValue(_) => "invalid_piece_value",
            PersistError::DuplicatePieceId(_) => "duplicate_piece_id",
            PersistError::StaleIdAllocator => "stale_ids",
            PersistError::UndosOverCap { .. } => "undos_over_cap",
            PersistError::PieceCounterAhead { .. } => "piece_counter_ahead",
        }
    }
}
