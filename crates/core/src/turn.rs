//! Turn rules - phase transitions, combo handling and game-over detection
//!
//! ```text
//! PLACE --placed, board can move--> SLIDE
//! PLACE --placed, board stuck-----> PLACE
//! SLIDE --moved, no merge---------> PLACE
//! SLIDE --moved, merged-----------> SLIDE   (combo)
//! SLIDE --board stuck-------------> PLACE   (fallback)
//! PLACE --no piece fits anywhere--> game over
//! ```

use crate::grid::Grid;
use crate::pieces::Piece;
use crate::placement::first_fit;
use crate::slide::SlideOutcome;
use crate::types::{Coord, Phase, Rotation};

/// Rule variant switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnRules {
    /// A scoring slide grants the option to return to PLACE early
    pub allow_skip_slide: bool,
}

/// Where the turn goes after a slide that moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideTransition {
    pub phase: Phase,
    pub can_skip_slide: bool,
}

/// Phase after a successful placement
pub fn phase_after_place(grid: &Grid) -> Phase {
    if grid.has_mobility() {
        Phase::Slide
    } else {
        Phase::Place
    }
}

/// Phase after a slide that moved. Scoring slides keep the player sliding.
pub fn phase_after_slide(outcome: &SlideOutcome, rules: TurnRules) -> SlideTransition {
    let transition = if outcome.score > 0 {
        SlideTransition {
            phase: Phase::Slide,
            can_skip_slide: rules.allow_skip_slide,
        }
    } else {
        SlideTransition {
            phase: Phase::Place,
            can_skip_slide: false,
        }
    };
    settle(transition, &outcome.grid)
}

/// Force PLACE when SLIDE has nothing left to do
pub fn settle(transition: SlideTransition, grid: &Grid) -> SlideTransition {
    if transition.phase == Phase::Slide && !grid.has_mobility() {
        return SlideTransition {
            phase: Phase::Place,
            can_skip_slide: false,
        };
    }
    transition
}

/// Any legal placement for the inventory: `(slot, rotation, origin)`.
///
/// Searches every non-empty slot, every rotation and every origin.
pub fn find_placement(grid: &Grid, slots: &[Option<Piece>]) -> Option<(usize, Rotation, Coord)> {
    slots.iter().enumerate().find_map(|(slot, piece)| {
        let piece = piece.as_ref()?;
        Rotation::ALL.iter().find_map(|&rotation| {
            first_fit(grid, piece.rotated_to(rotation).cells()).map(|origin| (slot, rotation, origin))
        })
    })
}

/// The game is over when no inventory piece fits anywhere in any rotation
pub fn is_game_over(grid: &Grid, slots: &[Option<Piece>]) -> bool {
    find_placement(grid, slots).is_none()
}
