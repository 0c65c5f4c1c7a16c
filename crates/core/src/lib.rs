//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the rules of the place-then-slide merge puzzle.
//! It has **no dependencies** on UI, timers, storage or I/O:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Atomic**: every action either applies completely or returns an error
//!   and leaves the state untouched
//! - **Portable**: hosts drive it with plain method calls and render from
//!   the returned reports
//!
//! # Module Structure
//!
//! - [`config`]: grid size, undo budget and rule variants
//! - [`error`]: action, board, config and save-data errors
//! - [`game_state`]: the aggregate that owns board, inventory, score and phase
//! - [`grid`]: square board of identified tiles
//! - [`persist`]: save records and rehydration
//! - [`pieces`]: tetromino catalog and quarter-turn rotation
//! - [`placement`]: fit checks and stamping pieces onto the board
//! - [`rng`]: seeded piece generator and id allocator
//! - [`slide`]: 2048-style compaction and merging
//! - [`snapshot`]: undo ledger and revive snapshots
//! - [`turn`]: phase transitions and the game-over scan
//!
//! # Game Rules
//!
//! - **Place**: pick one of three inventory pieces, rotate it freely and drop
//!   it onto empty cells. Every cell becomes a tile of the base value.
//! - **Slide**: move all tiles in one direction. Equal neighbours merge once
//!   per slide and the merged value is added to the score.
//! - A slide that merges keeps the turn in SLIDE; one that only moves tiles
//!   hands it back to PLACE.
//! - The game ends when no inventory piece fits anywhere in any rotation.
//!
//! # Example
//!
//! ```
//! use tetromerge_core::{GameConfig, GameState};
//! use tetromerge_core::types::Phase;
//!
//! let mut game = GameState::new(GameConfig::default(), 12345)?;
//! let (slot, rotation, (x, y)) = game.hint().expect("an empty board fits every piece");
//! while game.slot(slot).map(|p| p.rotation()) != Some(rotation) {
//!     game.try_rotate(slot)?;
//! }
//! game.try_place(slot, x, y)?;
//!
//! // Freshly placed tiles always touch, so a merge is available.
//! assert_eq!(game.phase(), Phase::Slide);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod persist;
pub mod pieces;
pub mod placement;
pub mod rng;
pub mod slide;
pub mod snapshot;
pub mod turn;

pub use tetromerge_types as types;

// Re-export commonly used types for convenience
pub use config::GameConfig;
pub use error::{ActionError, ConfigError, GridError, PersistError};
pub use game_state::{GameState, GameStats, PlaceReport, SlideReport};
pub use grid::{Cell, Grid, Tile};
pub use persist::{SavedGame, SavedPiece, SavedPosition, SAVE_VERSION};
pub use pieces::{get_shape, Piece, PieceShape};
pub use placement::{can_place, fits_anywhere, place, Placement};
pub use rng::{IdAllocator, PieceGenerator};
pub use slide::{can_slide, slide, slide_line, MergeEvent, SlideOutcome, TileMove};
pub use snapshot::{GameSnapshot, UndoLedger};
pub use turn::{find_placement, is_game_over, TurnRules};
