//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no engine logic, making them usable in any
//! context (core rules, session facade, persistence records).
//!
//! # Board Dimensions
//!
//! The board is square. Only a fixed set of sizes is supported:
//!
//! - **Supported sizes**: 4, 5, 7, 8, 10
//! - **Default size**: 5
//! - **Coordinates**: `(x, y)` where `x` is the column (left to right) and `y`
//!   is the row (top to bottom)
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SLOT_COUNT` | 3 | Pieces held in the player's inventory |
//! | `BASE_TILE_VALUE` | 1 | Value of every freshly placed tile |
//! | `DEFAULT_UNDOS` | 3 | Undo uses granted at the start of a game |
//! | `MAX_UNDOS` | 99 | Cap for replenished undo uses |
//! | `MAX_TILE_VALUE` | 2^30 | Largest tile value; tiles at the cap no longer merge |
//!
//! # Reveal Timing
//!
//! Presentation delays in milliseconds. The engine never waits on these, it
//! only reports them so the caller can schedule its animation:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLACE_REVEAL_MS` | 90 | Placed tiles drop in |
//! | `SLIDE_MOVE_MS` | 120 | Tiles travel to their new square |
//! | `MERGE_POP_MS` | 100 | Merged tile shows its doubled value |
//! | `SCORE_REVEAL_MS` | 60 | Score counter ticks up after merges land |
//!
//! # Examples
//!
//! ```
//! use tetromerge_types::{Direction, Rotation, ShapeType, SUPPORTED_GRID_SIZES};
//!
//! let shape = ShapeType::from_str("t").unwrap();
//! assert_eq!(shape, ShapeType::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::from_quarter_turns(-1), Rotation::West);
//!
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! assert!(SUPPORTED_GRID_SIZES.contains(&5));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Board sizes the engine accepts
pub const SUPPORTED_GRID_SIZES: [u8; 5] = [4, 5, 7, 8, 10];

/// Largest supported board edge, used to size stack-allocated lines
pub const MAX_GRID_SIZE: usize = 10;

/// Default board edge
pub const DEFAULT_GRID_SIZE: u8 = 5;

/// Number of inventory slots
pub const SLOT_COUNT: usize = 3;

/// Value written by every placed piece cell
pub const BASE_TILE_VALUE: u32 = 1;

/// Undo uses at the start of a game
pub const DEFAULT_UNDOS: u8 = 3;

/// Cap on replenished undo uses
pub const MAX_UNDOS: u8 = 99;

/// Largest tile value. Two tiles at the cap stay apart, so merged values
/// always fit in a `u32`.
pub const MAX_TILE_VALUE: u32 = 1 << 30;

/// Placed tiles drop-in duration
pub const PLACE_REVEAL_MS: u32 = 90;

/// Tile travel duration for a slide
pub const SLIDE_MOVE_MS: u32 = 120;

/// Merge pop duration, starts after tiles arrive
pub const MERGE_POP_MS: u32 = 100;

/// Score counter delay after merges land
pub const SCORE_REVEAL_MS: u32 = 60;

/// Relative offset or absolute board position as `(x, y)`
pub type Coord = (i8, i8);

/// Stable identity of a tile on the board.
///
/// Survives merges: the absorbing tile keeps its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Identity of a spawned piece (independent from the tiles it places)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// The seven piece shapes
///
/// Every shape covers exactly four cells:
/// - **I**: straight bar
/// - **O**: 2x2 square (rotation has no effect)
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeType {
    /// All shapes in catalog order
    pub const ALL: [ShapeType; 7] = [
        ShapeType::I,
        ShapeType::O,
        ShapeType::T,
        ShapeType::S,
        ShapeType::Z,
        ShapeType::J,
        ShapeType::L,
    ];

    /// Parse shape from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetromerge_types::ShapeType;
    ///
    /// assert_eq!(ShapeType::from_str("i"), Some(ShapeType::I));
    /// assert_eq!(ShapeType::from_str("O"), Some(ShapeType::O));
    /// assert_eq!(ShapeType::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeType::I),
            "o" => Some(ShapeType::O),
            "t" => Some(ShapeType::T),
            "s" => Some(ShapeType::S),
            "z" => Some(ShapeType::Z),
            "j" => Some(ShapeType::J),
            "l" => Some(ShapeType::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::I => "i",
            ShapeType::O => "o",
            ShapeType::T => "t",
            ShapeType::S => "s",
            ShapeType::Z => "z",
            ShapeType::J => "j",
            ShapeType::L => "l",
        }
    }
}

/// Quarter-turn rotation state
///
/// - **North**: canonical orientation (0 quarter turns)
/// - **East**: 1 quarter turn
/// - **South**: 2 quarter turns
/// - **West**: 3 quarter turns
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    /// Rotate one quarter turn
    ///
    /// # Examples
    ///
    /// ```
    /// use tetromerge_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Number of quarter turns from North (0..=3)
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from any quarter-turn count, normalized modulo 4
    ///
    /// # Examples
    ///
    /// ```
    /// use tetromerge_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_quarter_turns(5), Rotation::East);
    /// assert_eq!(Rotation::from_quarter_turns(-2), Rotation::South);
    /// ```
    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// Slide direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Rows are processed for Left/Right, columns for Up/Down
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Right and Down walk their lines back to front
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }
}

/// Turn phase: which player actions are legal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Player places a piece from the inventory
    #[default]
    Place,
    /// Player swipes the board
    Slide,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Place => "place",
            Phase::Slide => "slide",
        }
    }
}
