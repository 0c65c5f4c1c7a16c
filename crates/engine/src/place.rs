use tetromerge_core::{can_place, ActionError, GameState, PlaceReport};
use tetromerge_types::Rotation;

/// Turn the piece in `slot` to `target_rot`, then place it at `(x, y)`.
///
/// Either both happen or neither does: a blocked target leaves the slot in
/// its original rotation.
pub fn apply_place(
    state: &mut GameState,
    slot: usize,
    target_rot: Rotation,
    x: i8,
    y: i8,
) -> Result<PlaceReport, ActionError> {
    let piece = match state.slots().get(slot) {
        None => return Err(ActionError::SlotOutOfRange(slot)),
        Some(None) => return Err(ActionError::EmptySlot(slot)),
        Some(Some(piece)) => *piece,
    };

    // Rotation is free, so only the target cells matter.
    if !state.game_over() && !can_place(state.grid(), piece.rotated_to(target_rot).cells(), x, y) {
        return Err(ActionError::Blocked { x, y });
    }

    let snapshot = state.clone();
    let steps = (target_rot.quarter_turns() + 4 - piece.rotation().quarter_turns()) % 4;
    let result = (0..steps)
        .try_for_each(|_| state.try_rotate(slot).map(|_| ()))
        .and_then(|()| state.try_place(slot, x, y));

    if result.is_err() {
        *state = snapshot;
    }
    result
}
