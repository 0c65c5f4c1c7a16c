//! RNG module - uniform random piece generation and id allocation
//!
//! Each game owns exactly one seeded generator. Shape and rotation are drawn
//! uniformly and independently, so the same seed always yields the same
//! piece sequence. Draw `n` is keyed by `(seed, n)` alone, which lets a
//! resumed game jump straight to its position in the sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::pieces::Piece;
use crate::types::{PieceId, Rotation, ShapeType, TileId};

/// Monotonic source of tile and piece ids. Ids are never reused within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_tile: u32,
    next_piece: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_tile: 1,
            next_piece: 1,
        }
    }

    /// Resume from stored counters
    pub fn from_counters(next_tile: u32, next_piece: u32) -> Self {
        Self {
            next_tile,
            next_piece,
        }
    }

    pub fn next_tile_id(&mut self) -> TileId {
        let id = TileId(self.next_tile);
        self.next_tile = self.next_tile.wrapping_add(1);
        id
    }

    pub fn next_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_piece);
        self.next_piece = self.next_piece.wrapping_add(1);
        id
    }

    /// Next tile id that would be handed out, without consuming it
    pub fn peek_tile(&self) -> u32 {
        self.next_tile
    }

    pub fn peek_piece(&self) -> u32 {
        self.next_piece
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: u64,
    base_value: u32,
    drawn: u32,
}

impl PieceGenerator {
    /// Create a new generator with the given seed
    pub fn new(seed: u64, base_value: u32) -> Self {
        Self::resume(seed, base_value, 0)
    }

    /// Rebuild a generator that has already produced `drawn` pieces, so a
    /// resumed game continues the original sequence
    pub fn resume(seed: u64, base_value: u32, drawn: u32) -> Self {
        Self {
            seed,
            base_value,
            drawn,
        }
    }

    /// Draw a fresh piece
    pub fn generate(&mut self, ids: &mut IdAllocator) -> Piece {
        let mut rng = self.draw_rng();
        let shape = ShapeType::ALL[rng.gen_range(0..ShapeType::ALL.len())];
        let rotation = Rotation::ALL[rng.gen_range(0..Rotation::ALL.len())];
        self.drawn = self.drawn.wrapping_add(1);
        Piece::new(ids.next_piece_id(), shape, rotation, self.base_value)
    }

    fn draw_rng(&self) -> StdRng {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&self.seed.to_le_bytes());
        key[8..12].copy_from_slice(&self.drawn.to_le_bytes());
        StdRng::from_seed(key)
    }

    /// The seed this generator started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pieces produced so far
    pub fn drawn(&self) -> u32 {
        self.drawn
    }
}
