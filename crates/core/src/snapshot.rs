//! Snapshots for single-level undo and revive.

use crate::grid::Grid;
use crate::pieces::Piece;
use crate::types::{Phase, SLOT_COUNT};

/// Inventory slots
pub type Slots = [Option<Piece>; SLOT_COUNT];

/// Deep copy of the state an undo or revive restores
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub slots: Slots,
    pub score: u64,
    pub phase: Phase,
    pub can_skip_slide: bool,
}

/// Holds at most one undo snapshot plus the remaining undo uses.
///
/// Capturing replaces the previous snapshot. Taking consumes both the
/// snapshot and one use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoLedger {
    snapshot: Option<Box<GameSnapshot>>,
    remaining: u8,
    cap: u8,
}

impl UndoLedger {
    pub fn new(remaining: u8, cap: u8) -> Self {
        Self {
            snapshot: None,
            remaining: remaining.min(cap),
            cap,
        }
    }

    pub fn with_snapshot(snapshot: Option<GameSnapshot>, remaining: u8, cap: u8) -> Self {
        Self {
            snapshot: snapshot.map(Box::new),
            remaining: remaining.min(cap),
            cap,
        }
    }

    pub fn capture(&mut self, snapshot: GameSnapshot) {
        self.snapshot = Some(Box::new(snapshot));
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }

    pub fn can_undo(&self) -> bool {
        self.snapshot.is_some() && self.remaining > 0
    }

    /// Consume the snapshot and one use. Returns None (and changes nothing)
    /// when either is missing.
    pub fn take(&mut self) -> Option<GameSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.remaining -= 1;
        self.snapshot.take().map(|s| *s)
    }

    /// Add uses from a reward, saturating at the cap. Returns the new count.
    pub fn grant(&mut self, uses: u8) -> u8 {
        self.remaining = self.remaining.saturating_add(uses).min(self.cap);
        self.remaining
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(score: u64) -> GameSnapshot {
        GameSnapshot {
            grid: Grid::new(4).unwrap(),
            slots: [None; SLOT_COUNT],
            score,
            phase: Phase::Place,
            can_skip_slide: false,
        }
    }

    #[test]
    fn capture_replaces_previous() {
        let mut ledger = UndoLedger::new(3, 99);
        ledger.capture(snapshot(1));
        ledger.capture(snapshot(2));
        assert_eq!(ledger.take().map(|s| s.score), Some(2));
        assert!(ledger.take().is_none());
        assert_eq!(ledger.remaining(), 2);
    }

    #[test]
    fn take_without_uses_keeps_snapshot() {
        let mut ledger = UndoLedger::new(0, 99);
        ledger.capture(snapshot(5));
        assert!(ledger.take().is_none());
        assert!(ledger.has_snapshot());
    }

    #[test]
    fn take_without_snapshot_keeps_uses() {
        let mut ledger = UndoLedger::new(3, 99);
        assert!(ledger.take().is_none());
        assert_eq!(ledger.remaining(), 3);
    }

    #[test]
    fn grant_saturates_at_cap() {
        let mut ledger = UndoLedger::new(97, 99);
        assert_eq!(ledger.grant(5), 99);
        assert_eq!(ledger.grant(255), 99);
    }
}
