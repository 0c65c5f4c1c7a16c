//! Slide tests - compaction, merge identity and scoring

use tetromerge::core::slide::{can_slide, slide, slide_line};
use tetromerge::core::{Cell, Grid, IdAllocator, Tile};
use tetromerge::types::{Direction, TileId};

fn tile(id: u32, value: u32) -> Cell {
    Some(Tile::new(TileId(id), value))
}

fn grid(size: u8, values: &[u32]) -> Grid {
    Grid::from_values(size, values, &mut IdAllocator::new()).unwrap()
}

#[test]
fn test_merge_preserves_front_id() {
    let result = slide_line(&[tile(10, 2), None, tile(20, 2)]);
    assert_eq!(result.cells.as_slice(), &[tile(10, 4), None, None]);
    assert_eq!(result.merges.len(), 1);
    assert_eq!(result.merges[0].survivor, TileId(10));
    assert_eq!(result.merges[0].absorbed, TileId(20));
    assert_eq!(result.score, 4);
}

#[test]
fn test_no_double_merge_in_one_pass() {
    let line = [tile(1, 2), tile(2, 2), tile(3, 2), tile(4, 2)];
    let result = slide_line(&line);
    assert_eq!(result.cells.as_slice(), &[tile(1, 4), tile(3, 4), None, None]);
    assert_eq!(result.score, 8);
}

#[test]
fn test_merged_tile_does_not_merge_again() {
    // 2 2 4 -> 4 4, not 8
    let result = slide_line(&[tile(1, 2), tile(2, 2), tile(3, 4)]);
    assert_eq!(result.cells.as_slice(), &[tile(1, 4), tile(3, 4), None]);
}

#[test]
fn test_three_of_a_kind_merges_front_pair() {
    let result = slide_line(&[tile(1, 2), tile(2, 2), tile(3, 2)]);
    assert_eq!(result.cells.as_slice(), &[tile(1, 4), tile(3, 2), None]);
}

#[test]
fn test_packed_line_without_pairs_is_unchanged() {
    let result = slide_line(&[tile(1, 2), tile(2, 4), tile(3, 2)]);
    assert!(!result.changed);
    assert_eq!(result.score, 0);
    assert!(result.moves.is_empty());
}

#[test]
fn test_slide_right_reports_board_coordinates() {
    #[rustfmt::skip]
    let before = grid(4, &[
        2, 2, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let outcome = slide(&before, Direction::Right);

    assert!(outcome.moved);
    assert_eq!(outcome.score, 4);
    // Id 2 sat nearer the right wall, so it survives.
    assert_eq!(outcome.grid.get(3, 0), Some(tile(2, 4)));
    assert_eq!(outcome.merges[0].survivor_from, (1, 0));
    assert_eq!(outcome.merges[0].absorbed_from, (0, 0));
    assert_eq!(outcome.merges[0].at, (3, 0));
    assert_eq!(outcome.absorbed().collect::<Vec<_>>(), vec![TileId(1)]);
    // The input grid is untouched.
    assert_eq!(before.tile_count(), 2);
}

#[test]
fn test_slide_down_moves_columns() {
    #[rustfmt::skip]
    let before = grid(4, &[
        0, 4, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let outcome = slide(&before, Direction::Down);
    assert_eq!(outcome.moves.len(), 1);
    assert_eq!(outcome.moves[0].from, (1, 0));
    assert_eq!(outcome.moves[0].to, (1, 3));
    assert_eq!(outcome.score, 0);
}

#[test]
fn test_score_sums_every_line() {
    #[rustfmt::skip]
    let before = grid(4, &[
        1, 1, 0, 0,
        2, 2, 2, 2,
        0, 4, 0, 4,
        8, 0, 0, 0,
    ]);
    let outcome = slide(&before, Direction::Left);
    let merged: u64 = outcome.merges.iter().map(|m| u64::from(m.value)).sum();
    assert_eq!(outcome.score, merged);
    assert_eq!(outcome.score, 2 + 4 + 4 + 8);
    assert_eq!(outcome.grid.values(), vec![
        2, 0, 0, 0,
        4, 4, 0, 0,
        8, 0, 0, 0,
        8, 0, 0, 0,
    ]);
}

#[test]
fn test_wall_bound_tiles_do_not_move() {
    #[rustfmt::skip]
    let before = grid(4, &[
        2, 4, 0, 0,
        8, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    assert!(!can_slide(&before, Direction::Left));
    assert!(!can_slide(&before, Direction::Up));
    assert!(can_slide(&before, Direction::Right));
    assert!(can_slide(&before, Direction::Down));

    let outcome = slide(&before, Direction::Left);
    assert!(!outcome.moved);
    assert_eq!(outcome.grid, before);
}

// ============== Mobility Tests ==============

#[test]
fn test_checkerboard_has_no_mobility() {
    #[rustfmt::skip]
    let board = grid(4, &[
        2, 4, 2, 4,
        4, 2, 4, 2,
        2, 4, 2, 4,
        4, 2, 4, 2,
    ]);
    assert!(!board.has_mobility());
    for direction in Direction::ALL {
        assert!(!slide(&board, direction).moved);
    }
}

#[test]
fn test_full_board_with_a_pair_has_mobility() {
    #[rustfmt::skip]
    let board = grid(4, &[
        2, 2, 4, 8,
        4, 8, 2, 4,
        2, 4, 8, 2,
        4, 2, 4, 8,
    ]);
    assert!(board.has_mobility());
    assert!(slide(&board, Direction::Left).moved);
    assert!(!slide(&board, Direction::Up).moved);
}
