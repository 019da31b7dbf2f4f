use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[test]
fn test_initial_state() {
    let board = TicTacToe::new();
    assert_eq!(board.cells(), &[0; 9]);
    assert_eq!(board.side_to_move(), Player::One);
    assert_eq!(board.winner(), None);
    assert!(!board.is_terminal());
    assert_eq!(board.fingerprint(), board.full_hash());
}

#[test]
fn test_legal_moves() {
    let board = TicTacToe::new();
    let legal = board.expand_moves();
    assert_eq!(legal, (0..9).map(Action::Place).collect::<Vec<_>>());

    let board = TicTacToe::from_moves(&[4]).unwrap();
    let legal = board.expand_moves();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&Action::Place(4)));
    assert_eq!(board.side_to_move(), Player::Two);
}

#[test]
fn test_illegal_moves_are_rejected() {
    let mut board = TicTacToe::from_moves(&[4]).unwrap();
    assert!(board.apply_move(Action::Place(4), false).is_err());
    assert!(board.apply_move(Action::Place(9), false).is_err());

    // board unchanged
    assert_eq!(board, TicTacToe::from_moves(&[4]).unwrap());
}

#[test]
fn test_winning_game() {
    // X takes the top row
    let board = TicTacToe::from_moves(&[0, 3, 1, 4, 2]).unwrap();
    assert_eq!(board.winner(), Some(Player::One));
    assert!(board.is_terminal());
    assert!(board.expand_moves().is_empty());
    assert_eq!(board.evaluate(Player::One), 100);
    assert_eq!(board.evaluate(Player::Two), -100);
}

#[test]
fn test_no_moves_after_game_over() {
    let mut board = TicTacToe::from_moves(&[0, 3, 1, 4, 2]).unwrap();
    assert!(board.apply_move(Action::Place(8), false).is_err());
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let board = TicTacToe::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
    assert_eq!(board.winner(), None);
    assert!(board.is_full());
    assert!(board.is_terminal());
    assert!(board.expand_moves().is_empty());
}

#[test]
fn test_all_winning_lines() {
    for line in LINES {
        let mut cells = [0u8; 9];
        for sq in line {
            cells[sq] = 2;
        }
        assert_eq!(line_winner(&cells, &LINES), Some(Player::Two));
    }
}

#[test]
fn test_transposed_positions_share_fingerprint() {
    let a = TicTacToe::from_moves(&[0, 4, 1]).unwrap();
    let b = TicTacToe::from_moves(&[1, 4, 0]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let c = TicTacToe::from_moves(&[0, 4, 2]).unwrap();
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_side_to_move_is_part_of_fingerprint() {
    let mut a = TicTacToe::from_moves(&[4]).unwrap();
    let before = a.fingerprint();
    a.apply_move(Action::Place(0), false).unwrap();
    assert_ne!(before, a.fingerprint());
    assert_eq!(a.fingerprint(), a.full_hash());
}

#[test]
fn test_heuristic_playout_takes_win() {
    // X: 0, 1 / O: 3, 4, X to move wins at 2
    let board = TicTacToe::from_moves(&[0, 3, 1, 4]).unwrap();
    assert_eq!(board.playout_moves(true), vec![Action::Place(2)]);
    assert_eq!(board.playout_moves(false).len(), 5);
}

#[test]
fn test_heuristic_playout_blocks_loss() {
    // X: 0, 1 / O: 4, O to move must block at 2
    let board = TicTacToe::from_moves(&[0, 4, 1]).unwrap();
    assert_eq!(board.playout_moves(true), vec![Action::Place(2)]);
}

#[test]
fn test_evaluate_is_antisymmetric() {
    let board = TicTacToe::from_moves(&[4, 0, 8]).unwrap();
    assert_eq!(board.evaluate(Player::One), -board.evaluate(Player::Two));
    assert!(board.evaluate(Player::One) > 0);
}

#[test]
fn test_prior_prefers_centre() {
    let board = TicTacToe::new();
    let centre = board.prior_win_rate(Player::One, Action::Place(4));
    let corner = board.prior_win_rate(Player::One, Action::Place(0));
    let edge = board.prior_win_rate(Player::One, Action::Place(1));
    assert!(centre > corner && corner > edge);
}

#[test]
fn test_display() {
    let board = TicTacToe::from_moves(&[4, 0]).unwrap();
    assert_eq!(board.to_string(), "O..\n.X.\n...\n");
}

/// Play many random games and verify invariants hold
#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut board = TicTacToe::new();

        while !board.is_terminal() {
            let legal = board.expand_moves();
            assert!(!legal.is_empty(), "non-terminal position without moves (seed={seed})");

            let mover = board.side_to_move();
            let mv = legal[rng.gen_range(0..legal.len())];
            board.apply_move(mv, false).unwrap();

            assert_eq!(
                board.fingerprint(),
                board.full_hash(),
                "incremental hash drifted (seed={seed})"
            );
            if !board.is_terminal() {
                assert_ne!(board.side_to_move(), mover);
            }
        }

        assert!(board.moves_played() <= 9);
        assert!(board.expand_moves().is_empty());
        if board.winner().is_none() {
            assert!(board.is_full(), "draw only on a full board (seed={seed})");
        }
    }
}
