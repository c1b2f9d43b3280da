#![forbid(unsafe_code)]

//! Property tests for the engine invariants.
//!
//! - Gravity reaches a fixed point within `height` passes and leaves nothing floating.
//! - Matching a settled board twice gives identical results.
//! - Rotation never leaves the satellite off the board or on a puyo.
//! - Hard drop equals stepping down until blocked, then locking.
//! - Driving a clone never touches the original session.

use proptest::prelude::*;
use puyo_chain::core::gravity::is_settled;
use puyo_chain::core::{apply_gravity, find_matches, settle, Board, PuyoPair, Session};
use puyo_chain::types::{GameAction, Phase, Puyo, PuyoColor};

fn arb_board() -> impl Strategy<Value = Board> {
    (1u16..=8, 2u16..=14).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::option::weighted(0.45, 0usize..5), (w * h) as usize).prop_map(
            move |cells| {
                let mut board = Board::new(w, h);
                for (i, cell) in cells.into_iter().enumerate() {
                    let x = (i % w as usize) as i16;
                    let y = (i / w as usize) as i16;
                    board.set(x, y, cell.map(|c| Puyo::new(PuyoColor::ALL[c])));
                }
                board
            },
        )
    })
}

fn arb_action() -> impl Strategy<Value = GameAction> {
    prop::sample::select(vec![
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::SoftDropStart,
        GameAction::SoftDropStop,
        GameAction::Drop,
        GameAction::HardDrop,
    ])
}

fn assert_pair_legal(pair: &PuyoPair, board: &Board) {
    let (dx, dy) = pair.offset();
    assert_eq!(dx.abs() + dy.abs(), 1, "satellite must be adjacent");
    for cell in pair.cells() {
        assert!(board.is_within(cell.x, cell.y));
        assert!(board.is_empty(cell.x, cell.y));
    }
}

proptest! {
    #[test]
    fn gravity_reaches_fixed_point(mut board in arb_board()) {
        let occupied = board.occupied_count();
        let passes = settle(&mut board);
        prop_assert!(passes < board.height() as u32);
        prop_assert!(is_settled(&board));
        prop_assert!(!apply_gravity(&mut board));
        prop_assert_eq!(board.occupied_count(), occupied);
    }

    #[test]
    fn find_matches_is_idempotent(mut board in arb_board(), required in 1usize..6) {
        settle(&mut board);
        let first = find_matches(&board, required);
        let second = find_matches(&board, required);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.groups_cleared.iter().sum::<usize>(), first.cleared_count());
        prop_assert!(first.groups_cleared.iter().all(|&g| g >= required));
    }

    #[test]
    fn rotation_stays_legal(
        seed in any::<u32>(),
        actions in prop::collection::vec(arb_action(), 1..120),
    ) {
        let mut session = Session::new_default(seed);
        for action in actions {
            session.process_input(action);
            if let Some(pair) = session.active() {
                assert_pair_legal(&pair, session.board());
            }
            while session.phase() == Phase::Resolving {
                session.tick(0.25);
            }
        }
    }

    #[test]
    fn hard_drop_equals_repeated_drop(
        seed in any::<u32>(),
        setup in prop::collection::vec(arb_action(), 0..40),
    ) {
        let mut session = Session::new_default(seed);
        for action in setup {
            session.process_input(action);
            while session.phase() == Phase::Resolving {
                session.tick(0.25);
            }
        }
        prop_assume!(session.phase() == Phase::Falling);

        let mut hard = session.clone();
        let mut stepped = session.clone();
        hard.process_input(GameAction::HardDrop);

        let piece = stepped.piece_id();
        while stepped.piece_id() == piece && stepped.phase() == Phase::Falling {
            stepped.process_input(GameAction::Drop);
        }

        prop_assert_eq!(hard.board(), stepped.board());
        prop_assert_eq!(hard.phase(), stepped.phase());
        prop_assert_eq!(hard.score(), stepped.score());
        prop_assert_eq!(hard.active(), stepped.active());
    }

    #[test]
    fn clone_is_independent(
        seed in any::<u32>(),
        actions in prop::collection::vec(arb_action(), 1..60),
    ) {
        let live = Session::new_default(seed);
        let before = live.snapshot();
        let mut probe = live.clone();
        for action in actions {
            probe.process_input(action);
            probe.tick(0.1);
        }
        prop_assert_eq!(live.snapshot(), before);
    }
}
