use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn mv(s: &str) -> Move {
    Move::parse(s).unwrap()
}

#[test]
fn test_initial_position() {
    let board = Breakthrough::new();
    assert_eq!(board.pieces(Player::One), PIECES_PER_SIDE);
    assert_eq!(board.pieces(Player::Two), PIECES_PER_SIDE);
    assert_eq!(board.side_to_move(), Player::One);
    assert_eq!(board.winner(), None);
    assert_eq!(board.fingerprint(), board.full_hash());
    // front row pieces: 3 moves each except at the edges
    assert_eq!(board.expand_moves().len(), 22);
}

#[test]
fn test_move_notation() {
    let m = mv("b2b3");
    assert_eq!(m, Move::new(49, 41));
    assert_eq!(m.to_string(), "b2b3");
    assert_eq!(Move::parse("a8h1"), Some(Move::new(0, 63)));
    assert_eq!(Move::parse("i2i3"), None);
    assert_eq!(Move::parse("b2"), None);
}

#[test]
fn test_straight_move_cannot_capture() {
    let board = Breakthrough::from_rows(
        &[
            "........",
            "........",
            "........",
            "...b....",
            "...w....",
            "........",
            "........",
            "........",
        ],
        Player::One,
    )
    .unwrap();
    let moves = board.expand_moves();
    assert!(!moves.contains(&mv("d4d5")));
    assert!(moves.contains(&mv("d4c5")));
    assert!(moves.contains(&mv("d4e5")));
}

#[test]
fn test_diagonal_capture() {
    let mut board = Breakthrough::from_rows(
        &[
            "bbbbbbbb",
            "........",
            "........",
            "....b...",
            "...w....",
            "........",
            "........",
            "wwwwwwww",
        ],
        Player::One,
    )
    .unwrap();
    assert_eq!(board.pieces(Player::Two), 9);
    board.apply_move(mv("d4e5"), false).unwrap();
    assert_eq!(board.pieces(Player::Two), 8);
    assert_eq!(board.piece_at(Move::parse("e5e6").unwrap().from as usize), Some(Player::One));
    assert_eq!(board.fingerprint(), board.full_hash());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_reaching_far_row_wins() {
    let mut board = Breakthrough::from_rows(
        &[
            "........",
            "w.......",
            "........",
            "........",
            "........",
            "........",
            "......b.",
            "........",
        ],
        Player::One,
    )
    .unwrap();
    board.apply_move(mv("a7a8"), false).unwrap();
    assert_eq!(board.winner(), Some(Player::One));
    assert!(board.is_terminal());
    assert!(board.expand_moves().is_empty());
}

#[test]
fn test_capturing_last_piece_wins() {
    let mut board = Breakthrough::from_rows(
        &[
            "........",
            "........",
            "........",
            "..b.....",
            "...w....",
            "........",
            "........",
            "........",
        ],
        Player::Two,
    )
    .unwrap();
    board.apply_move(mv("c5d4"), false).unwrap();
    assert_eq!(board.winner(), Some(Player::Two));
    assert_eq!(board.pieces(Player::One), 0);
}

#[test]
fn test_illegal_move_is_rejected() {
    let mut board = Breakthrough::new();
    assert!(board.apply_move(mv("a2a4"), false).is_err());
    assert!(board.apply_move(mv("a7a6"), false).is_err());
    assert_eq!(board, Breakthrough::new());
}

#[test]
fn test_transposition_fingerprint() {
    let mut a = Breakthrough::new();
    for m in ["a2a3", "a7a6", "h2h3", "h7h6"] {
        a.apply_move(mv(m), false).unwrap();
    }
    let mut b = Breakthrough::new();
    for m in ["h2h3", "h7h6", "a2a3", "a7a6"] {
        b.apply_move(mv(m), false).unwrap();
    }
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint(), a.full_hash());
}

#[test]
fn test_heuristic_playout_prefers_win() {
    let board = Breakthrough::from_rows(
        &[
            "....b...",
            "w.......",
            "........",
            "........",
            "........",
            "........",
            "......b.",
            ".....w..",
        ],
        Player::One,
    )
    .unwrap();
    assert_eq!(board.playout_moves(true), vec![mv("a7a8"), mv("a7b8")]);
}

#[test]
fn test_heuristic_playout_defends() {
    // black on g2 threatens to reach row 1; white can capture it from f1 or h1
    let board = Breakthrough::from_rows(
        &[
            "b.......",
            "........",
            "........",
            "........",
            "........",
            "...w....",
            "......b.",
            ".....w.w",
        ],
        Player::One,
    )
    .unwrap();
    let moves = board.playout_moves(true);
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.to_string().ends_with("g2")));
}

#[test]
fn test_evaluate_is_antisymmetric() {
    let mut board = Breakthrough::new();
    assert_eq!(board.evaluate(Player::One), 0);
    board.apply_move(mv("d2d3"), false).unwrap();
    assert_eq!(board.evaluate(Player::One), ROW_VALUE);
    assert_eq!(board.evaluate(Player::Two), -ROW_VALUE);
}

#[test]
fn test_incremental_score_matches_full_scan() {
    for seed in 0..6 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut board = Breakthrough::new();
        while !board.is_terminal() {
            let moves = board.expand_moves();
            let m = moves[rng.gen_range(0..moves.len())];
            board.apply_move(m, true).unwrap();

            let [one, two] = board.full_score();
            assert_eq!(board.evaluate(Player::One), one - two, "seed={seed}");
            assert_eq!(board.evaluate(Player::Two), two - one, "seed={seed}");
        }
    }
}

#[test]
fn test_score_without_early_termination_is_rescanned() {
    let mut board = Breakthrough::new();
    board.apply_move(mv("d2d3"), true).unwrap();
    board.apply_move(mv("e7e6"), false).unwrap();
    board.apply_move(mv("d3d4"), true).unwrap();
    // one row for each white step, one for the black step
    assert_eq!(board.evaluate(Player::One), ROW_VALUE);

    let mut fresh = Breakthrough::new();
    for m in ["d2d3", "e7e6", "d3d4"] {
        fresh.apply_move(mv(m), true).unwrap();
    }
    assert_eq!(fresh.evaluate(Player::One), board.evaluate(Player::One));
    assert_eq!(fresh, board);
}

#[test]
fn test_capture_updates_score() {
    let mut board = Breakthrough::from_rows(
        &[
            "bbbbbbbb",
            "........",
            "........",
            "....b...",
            "...w....",
            "........",
            "........",
            "wwwwwwww",
        ],
        Player::One,
    )
    .unwrap();
    board.apply_move(mv("d4e5"), true).unwrap();
    let [one, two] = board.full_score();
    assert_eq!(board.evaluate(Player::One), one - two);
}

#[test]
fn test_malformed_moves_are_rejected() {
    let start = Breakthrough::new();
    let mut board = Breakthrough::new();
    // wrong direction, sideways, two rows, enemy piece, off the board
    for m in [mv("b2b1"), mv("a3b3"), mv("b2b4"), mv("b7b6"), Move::new(70, 62)] {
        assert!(board.apply_move(m, false).is_err(), "{m:?} accepted");
    }
    assert_eq!(board, start);
}

#[test]
fn test_prior_rates_captures_higher() {
    let board = Breakthrough::from_rows(
        &[
            "bbbbbbbb",
            "........",
            "........",
            "....b...",
            "...w....",
            "........",
            "........",
            "wwwwwwww",
        ],
        Player::One,
    )
    .unwrap();
    let capture = board.prior_win_rate(Player::One, mv("d4e5"));
    let quiet = board.prior_win_rate(Player::One, mv("a1a2"));
    assert!(capture > quiet);
    assert!((0.0..=1.0).contains(&capture));
}

#[test]
fn test_random_games_terminate_with_winner() {
    for seed in 0..10 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut board = Breakthrough::new();
        while !board.is_terminal() {
            let moves = board.playout_moves(seed % 2 == 0);
            assert!(!moves.is_empty(), "non-terminal position without moves (seed={seed})");
            let m = moves[rng.gen_range(0..moves.len())];
            board.apply_move(m, false).unwrap();
            assert_eq!(board.fingerprint(), board.full_hash());
        }
        assert!(board.winner().is_some());
    }
}
