//! Reveal schedules - advisory animation timing for a committed action
//!
//! The engine applies every action immediately. A `RevealSchedule` tells the
//! presentation layer in which order, and at which offsets, to show what
//! happened. Steps are sorted by `at_ms` and never go backwards.
//!
//! ```text
//! place:  0ms tiles appear ........ PLACE_REVEAL_MS phase
//! slide:  0ms tiles travel ........ SLIDE_MOVE_MS merges pop
//!         + MERGE_POP_MS score .... + SCORE_REVEAL_MS phase
//! ```

use serde::Serialize;

use tetromerge_core::{PlaceReport, SlideReport};
use tetromerge_types::{
    Coord, Phase, TileId, MERGE_POP_MS, PLACE_REVEAL_MS, SCORE_REVEAL_MS, SLIDE_MOVE_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RevealKind {
    /// A placed tile fades in
    TileAppear { id: TileId, at: Coord, value: u32 },
    /// A tile travels to its new square
    TileMove { id: TileId, from: Coord, to: Coord },
    /// `absorbed` reaches `at` and disappears; `survivor` shows `value`
    Merge {
        survivor: TileId,
        absorbed: TileId,
        at: Coord,
        value: u32,
    },
    Score { delta: u64, total: u64 },
    Phase { phase: Phase },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealStep {
    pub at_ms: u32,
    pub kind: RevealKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevealSchedule {
    steps: Vec<RevealStep>,
}

impl RevealSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    fn push(&mut self, at_ms: u32, kind: RevealKind) {
        debug_assert!(self.steps.last().map_or(true, |s| s.at_ms <= at_ms));
        self.steps.push(RevealStep { at_ms, kind });
    }

    fn push_outcome(&mut self, at_ms: u32, phase: Phase, game_over: bool) {
        self.push(at_ms, RevealKind::Phase { phase });
        if game_over {
            self.push(at_ms, RevealKind::GameOver);
        }
    }

    /// Tiles appear together, then the phase changes
    pub fn for_place(report: &PlaceReport) -> Self {
        let mut schedule = Self::empty();
        for &(at, tile) in &report.tiles {
            schedule.push(
                0,
                RevealKind::TileAppear {
                    id: tile.id,
                    at,
                    value: tile.value,
                },
            );
        }
        schedule.push_outcome(PLACE_REVEAL_MS, report.phase, report.game_over);
        schedule
    }

    /// Travel, merge pops, score, then phase. `total` is the score after
    /// the slide.
    pub fn for_slide(report: &SlideReport, total: u64) -> Self {
        let mut schedule = Self::empty();
        let outcome = &report.outcome;

        if !outcome.moved {
            if report.forced_place {
                schedule.push_outcome(0, report.phase, report.game_over);
            }
            return schedule;
        }

        for m in &outcome.moves {
            schedule.push(
                0,
                RevealKind::TileMove {
                    id: m.id,
                    from: m.from,
                    to: m.to,
                },
            );
        }
        // Survivors already travel with the moves above; absorbed tiles
        // head for the square they merge into.
        for m in &outcome.merges {
            if m.absorbed_from != m.at {
                schedule.push(
                    0,
                    RevealKind::TileMove {
                        id: m.absorbed,
                        from: m.absorbed_from,
                        to: m.at,
                    },
                );
            }
        }

        let mut at_ms = SLIDE_MOVE_MS;
        if !outcome.merges.is_empty() {
            for m in &outcome.merges {
                schedule.push(
                    at_ms,
                    RevealKind::Merge {
                        survivor: m.survivor,
                        absorbed: m.absorbed,
                        at: m.at,
                        value: m.value,
                    },
                );
            }
            at_ms += MERGE_POP_MS;
            schedule.push(
                at_ms,
                RevealKind::Score {
                    delta: outcome.score,
                    total,
                },
            );
            at_ms += SCORE_REVEAL_MS;
        }

        schedule.push_outcome(at_ms, report.phase, report.game_over);
        schedule
    }

    /// Undo and revive swap the whole position at once
    pub fn for_restore(phase: Phase) -> Self {
        let mut schedule = Self::empty();
        schedule.push(0, RevealKind::Phase { phase });
        schedule
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offset of the last step
    pub fn duration_ms(&self) -> u32 {
        self.steps.last().map_or(0, |s| s.at_ms)
    }

    /// Steps due in the window `(after_ms, until_ms]`
    pub fn due(&self, after_ms: u32, until_ms: u32) -> impl Iterator<Item = &RevealStep> + '_ {
        self.steps
            .iter()
            .filter(move |s| s.at_ms > after_ms && s.at_ms <= until_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetromerge_core::{slide, GameConfig, GameState, Grid, IdAllocator};
    use tetromerge_types::{Direction, TileId};

    fn placed() -> (GameState, PlaceReport) {
        let mut state = GameState::new(GameConfig::default(), 5).unwrap();
        let (slot, rotation, (x, y)) = state.hint().unwrap();
        while state.slot(slot).unwrap().rotation() != rotation {
            state.try_rotate(slot).unwrap();
        }
        let report = state.try_place(slot, x, y).unwrap();
        (state, report)
    }

    fn assert_monotonic(schedule: &RevealSchedule) {
        let offsets: Vec<u32> = schedule.steps().iter().map(|s| s.at_ms).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
    }

    #[test]
    fn place_reveals_tiles_then_phase() {
        let (_, report) = placed();
        let schedule = RevealSchedule::for_place(&report);

        let appear = schedule
            .steps()
            .iter()
            .filter(|s| matches!(s.kind, RevealKind::TileAppear { .. }))
            .count();
        assert_eq!(appear, 4);
        assert_eq!(
            schedule.steps().last().map(|s| s.kind),
            Some(RevealKind::Phase { phase: Phase::Slide })
        );
        assert_eq!(schedule.duration_ms(), PLACE_REVEAL_MS);
        assert_monotonic(&schedule);
    }

    #[test]
    fn slide_orders_travel_merge_score_phase() {
        let (mut state, _) = placed();
        // Placed tiles touch, so some direction merges.
        let direction = Direction::ALL
            .into_iter()
            .find(|&d| slide(state.grid(), d).score > 0)
            .unwrap();
        let report = state.try_slide(direction).unwrap();
        let schedule = RevealSchedule::for_slide(&report, state.score());
        assert_monotonic(&schedule);

        let merge = schedule
            .steps()
            .iter()
            .position(|s| matches!(s.kind, RevealKind::Merge { .. }))
            .unwrap();
        let score = schedule
            .steps()
            .iter()
            .position(|s| matches!(s.kind, RevealKind::Score { .. }))
            .unwrap();
        assert!(merge < score);
        assert_eq!(schedule.steps()[merge].at_ms, SLIDE_MOVE_MS);
        assert_eq!(
            schedule.steps()[score].kind,
            RevealKind::Score {
                delta: report.outcome.score,
                total: state.score()
            }
        );
        assert_eq!(
            schedule.duration_ms(),
            SLIDE_MOVE_MS + MERGE_POP_MS + SCORE_REVEAL_MS
        );
        assert!(matches!(
            schedule.steps().last().map(|s| s.kind),
            Some(RevealKind::Phase { .. }) | Some(RevealKind::GameOver)
        ));
    }

    #[test]
    fn merging_tiles_travel_once_each() {
        let mut values = [0; 16];
        values[1] = 2;
        values[2] = 2;
        let grid = Grid::from_values(4, &values, &mut IdAllocator::new()).unwrap();
        let report = SlideReport {
            outcome: slide(&grid, Direction::Left),
            phase: Phase::Place,
            can_skip_slide: false,
            forced_place: false,
            game_over: false,
        };
        let schedule = RevealSchedule::for_slide(&report, 4);

        let travel: Vec<RevealKind> = schedule
            .steps()
            .iter()
            .filter(|s| matches!(s.kind, RevealKind::TileMove { .. }))
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            travel,
            vec![
                RevealKind::TileMove {
                    id: TileId(1),
                    from: (1, 0),
                    to: (0, 0)
                },
                RevealKind::TileMove {
                    id: TileId(2),
                    from: (2, 0),
                    to: (0, 0)
                },
            ]
        );
    }

    #[test]
    fn unmoved_slide_reveals_only_a_forced_phase() {
        let mut report = SlideReport {
            outcome: slide(&Grid::new(5).unwrap(), Direction::Left),
            phase: Phase::Slide,
            can_skip_slide: false,
            forced_place: false,
            game_over: false,
        };
        assert!(RevealSchedule::for_slide(&report, 0).is_empty());

        report.phase = Phase::Place;
        report.forced_place = true;
        report.game_over = true;
        let kinds: Vec<RevealKind> = RevealSchedule::for_slide(&report, 0)
            .steps()
            .iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                RevealKind::Phase { phase: Phase::Place },
                RevealKind::GameOver
            ]
        );
    }

    #[test]
    fn restore_is_immediate() {
        let schedule = RevealSchedule::for_restore(Phase::Place);
        assert_eq!(schedule.duration_ms(), 0);
        assert_eq!(schedule.steps().len(), 1);
    }

    #[test]
    fn due_window_is_half_open() {
        let (_, report) = placed();
        let schedule = RevealSchedule::for_place(&report);
        assert_eq!(schedule.due(0, 0).count(), 0);
        assert_eq!(schedule.due(0, PLACE_REVEAL_MS).count(), 1);
    }
}
