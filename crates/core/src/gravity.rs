//! Gravity module - settles floating puyos
//!
//! One pass moves every puyo that has an empty cell directly below it down by
//! exactly one row. Rows are scanned bottom-up (starting at the second-to-last
//! row) so a falling column shifts as a unit within a pass. Matching is only
//! meaningful on a settled board, so callers run [`settle`] before detection.

use crate::board::Board;

/// Apply one gravity pass. Returns true if any puyo moved.
pub fn apply_gravity(board: &mut Board) -> bool {
    let width = board.width() as i16;
    let height = board.height() as i16;
    if height < 2 {
        return false;
    }

    let mut moved = false;
    for y in (0..height - 1).rev() {
        for x in 0..width {
            if board.is_occupied(x, y) && board.is_empty(x, y + 1) {
                let cell = board.take(x, y);
                board.set(x, y + 1, cell);
                moved = true;
            }
        }
    }
    moved
}

/// Run gravity passes until nothing moves. Returns the number of passes that moved.
///
/// A puyo falls at most `height - 1` rows and every moving pass lowers each
/// floating puyo by one, so this terminates within `height - 1` moving passes.
pub fn settle(board: &mut Board) -> u32 {
    let mut passes = 0;
    while apply_gravity(board) {
        passes += 1;
    }
    passes
}

/// True if every occupied cell is on the bottom row or rests on another puyo
pub fn is_settled(board: &Board) -> bool {
    let width = board.width() as i16;
    let height = board.height() as i16;
    (0..height - 1).all(|y| (0..width).all(|x| !(board.is_occupied(x, y) && board.is_empty(x, y + 1))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pass_moves_one_row() {
        let mut board = Board::from_ascii(&["R..", "...", "..."]).unwrap();
        assert!(apply_gravity(&mut board));
        assert_eq!(board.to_ascii(), vec!["...", "R..", "..."]);
        assert!(apply_gravity(&mut board));
        assert_eq!(board.to_ascii(), vec!["...", "...", "R.."]);
        assert!(!apply_gravity(&mut board));
    }

    #[test]
    fn test_column_falls_as_unit_per_pass() {
        let mut board = Board::from_ascii(&["G", "R", ".", "."]).unwrap();
        assert!(apply_gravity(&mut board));
        assert_eq!(board.to_ascii(), vec![".", "G", "R", "."]);
    }

    #[test]
    fn test_settle_reaches_fixed_point() {
        let mut board = Board::from_ascii(&[
            "R.B", //
            "...", //
            "G..", //
            "..Y", //
            "...",
        ])
        .unwrap();
        let passes = settle(&mut board);
        assert!(passes <= 4);
        assert!(is_settled(&board));
        assert_eq!(board.to_ascii(), vec!["...", "...", "...", "R.B", "G.Y"]);
    }

    #[test]
    fn test_settled_board_does_not_move() {
        let mut board = Board::from_ascii(&["...", "R..", "GB."]).unwrap();
        assert!(is_settled(&board));
        assert_eq!(settle(&mut board), 0);
    }

    #[test]
    fn test_single_row_board_never_moves() {
        let mut board = Board::from_ascii(&["RGB"]).unwrap();
        assert!(!apply_gravity(&mut board));
        assert!(is_settled(&board));
    }
}
