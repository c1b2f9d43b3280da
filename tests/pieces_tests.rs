//! Pair movement and rotation tests

use puyo_chain::core::{Board, PieceCell, PuyoPair};
use puyo_chain::types::{Puyo, PuyoColor};

fn spawn() -> PuyoPair {
    PuyoPair::spawn(6, PuyoColor::Green, PuyoColor::Yellow)
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_column_for_widths() {
    for (width, column) in [(1u16, 0i16), (2, 0), (3, 1), (6, 2), (7, 3), (8, 3)] {
        let pair = PuyoPair::spawn(width, PuyoColor::Red, PuyoColor::Red);
        assert_eq!(pair.pivot.x, column, "width {}", width);
        assert_eq!(pair.satellite.x, column);
        assert_eq!(pair.pivot.y, 0);
        assert_eq!(pair.satellite.y, 1);
    }
}

#[test]
fn test_cells_are_pivot_then_satellite() {
    let pair = spawn();
    assert_eq!(
        pair.cells(),
        [
            PieceCell::new(2, 0, PuyoColor::Green),
            PieceCell::new(2, 1, PuyoColor::Yellow)
        ]
    );
}

// ============== Movement Tests ==============

#[test]
fn test_move_across_the_board() {
    let board = Board::new(6, 12);
    let mut pair = spawn();

    let mut steps = 0;
    while pair.try_move(&board, 1, 0) {
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(pair.pivot.x, 5);

    while pair.try_move(&board, -1, 0) {}
    assert_eq!(pair.pivot.x, 0);
}

#[test]
fn test_move_needs_both_cells_free() {
    let mut board = Board::new(6, 12);
    // Only the satellite's target is blocked
    board.set(1, 1, Some(Puyo::new(PuyoColor::Blue)));

    let mut pair = spawn();
    let before = pair;
    assert!(!pair.try_move(&board, -1, 0));
    assert_eq!(pair, before);
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_keeps_unit_offset() {
    let board = Board::new(6, 12);
    let mut pair = spawn();
    pair.try_move(&board, 0, 4);

    for clockwise in [true, true, false, true, false, false, false, true] {
        pair.try_rotate(&board, clockwise);
        let (dx, dy) = pair.offset();
        assert_eq!(dx.abs() + dy.abs(), 1);
    }
}

#[test]
fn test_rotation_into_occupied_cell_is_noop() {
    let mut board = Board::new(6, 12);
    board.set(1, 3, Some(Puyo::new(PuyoColor::Red)));

    let mut pair = spawn();
    pair.try_move(&board, 0, 3);
    // Pivot (2,3), satellite (2,4): clockwise targets (1,3)
    let before = pair;
    assert!(!pair.try_rotate(&board, true));
    assert_eq!(pair, before);

    // Counter-clockwise targets (3,3), which is free
    assert!(pair.try_rotate(&board, false));
    assert_eq!(pair.offset(), (1, 0));
    assert_eq!(pair.pivot, before.pivot);
}

#[test]
fn test_rotation_only_moves_the_satellite() {
    let board = Board::new(6, 12);
    let mut pair = spawn();
    pair.try_move(&board, 0, 5);
    let pivot = pair.pivot;
    for _ in 0..4 {
        assert!(pair.try_rotate(&board, false));
        assert_eq!(pair.pivot, pivot);
    }
    assert_eq!(pair.offset(), (0, 1));
}

// ============== Drop Tests ==============

#[test]
fn test_drop_distance_lands_on_stack() {
    let mut board = Board::new(6, 12);
    for y in 8..12 {
        board.set(2, y, Some(Puyo::new(PuyoColor::Purple)));
    }
    let pair = spawn();
    assert_eq!(pair.drop_distance(&board), 6);

    let mut landed = pair;
    landed.try_move(&board, 0, 6);
    assert!(!landed.try_move(&board, 0, 1));
    assert_eq!(landed.satellite.y, 7);
}

#[test]
fn test_horizontal_pair_lands_unevenly() {
    let mut board = Board::new(6, 12);
    board.set(3, 11, Some(Puyo::new(PuyoColor::Red)));

    let mut pair = spawn();
    assert!(pair.try_rotate(&board, false));
    // Pivot over column 2, satellite over column 3 which is one higher
    assert_eq!(pair.drop_distance(&board), 10);

    pair.try_move(&board, 0, 10);
    pair.lock_into(&mut board);
    assert!(board.is_occupied(2, 10));
    assert!(board.is_occupied(3, 10));
    assert!(board.is_empty(2, 11));
}
