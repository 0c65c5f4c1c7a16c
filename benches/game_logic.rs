use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetromerge::core::placement::{can_place, first_fit};
use tetromerge::core::slide::slide;
use tetromerge::core::{is_game_over, GameConfig, GameState, Grid, IdAllocator, Piece};
use tetromerge::types::{Direction, PieceId, Rotation, ShapeType};

fn busy_grid(size: u8) -> Grid {
    let values: Vec<u32> = (0..size as u32 * size as u32)
        .map(|i| match i % 5 {
            0 => 0,
            1 | 2 => 2,
            3 => 4,
            _ => 8,
        })
        .collect();
    Grid::from_values(size, &values, &mut IdAllocator::new()).unwrap()
}

fn checkerboard(size: u8) -> Grid {
    let values: Vec<u32> = (0..size as u32)
        .flat_map(|y| (0..size as u32).map(move |x| if (x + y) % 2 == 0 { 2 } else { 4 }))
        .collect();
    Grid::from_values(size, &values, &mut IdAllocator::new()).unwrap()
}

fn bench_slide(c: &mut Criterion) {
    let grid = busy_grid(10);
    c.bench_function("slide_10x10_left", |b| {
        b.iter(|| slide(black_box(&grid), Direction::Left))
    });
    c.bench_function("slide_10x10_down", |b| {
        b.iter(|| slide(black_box(&grid), Direction::Down))
    });
}

fn bench_mobility(c: &mut Criterion) {
    let grid = checkerboard(10);
    c.bench_function("mobility_full_10x10", |b| {
        b.iter(|| black_box(&grid).has_mobility())
    });
}

fn bench_game_over_scan(c: &mut Criterion) {
    // Worst case: nothing fits, so every slot, rotation and origin is tried.
    let grid = checkerboard(10);
    let slots = [
        Some(Piece::new(PieceId(1), ShapeType::I, Rotation::North, 1)),
        Some(Piece::new(PieceId(2), ShapeType::T, Rotation::North, 1)),
        Some(Piece::new(PieceId(3), ShapeType::L, Rotation::North, 1)),
    ];
    c.bench_function("game_over_scan_10x10", |b| {
        b.iter(|| is_game_over(black_box(&grid), black_box(&slots)))
    });
}

fn bench_placement(c: &mut Criterion) {
    let grid = busy_grid(8);
    let piece = Piece::new(PieceId(1), ShapeType::S, Rotation::East, 1);
    c.bench_function("can_place", |b| {
        b.iter(|| can_place(black_box(&grid), piece.cells(), 3, 3))
    });
    c.bench_function("first_fit_8x8", |b| {
        b.iter(|| first_fit(black_box(&grid), piece.cells()))
    });
}

fn bench_turn(c: &mut Criterion) {
    c.bench_function("place_and_slide_turn", |b| {
        b.iter(|| {
            let mut state = GameState::new(GameConfig::default(), 12345).unwrap();
            if let Some((slot, rotation, (x, y))) = state.hint() {
                while state.slot(slot).map(|p| p.rotation()) != Some(rotation) {
                    let _ = state.try_rotate(slot);
                }
                let _ = state.try_place(slot, x, y);
            }
            let _ = state.try_slide(Direction::Left);
            state
        })
    });
}

criterion_group!(
    benches,
    bench_slide,
    bench_mobility,
    bench_game_over_scan,
    bench_placement,
    bench_turn
);
criterion_main!(benches);
