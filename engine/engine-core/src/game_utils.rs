//! Helpers shared by the two-player game implementations.

use crate::player::Player;

/// Flip a score given from `from`'s point of view to `to`'s.
#[inline]
pub fn score_for(score: i32, from: Player, to: Player) -> i32 {
    if from == to {
        score
    } else {
        -score
    }
}

/// Find a line of three equal, non-empty cells.
///
/// `cells` holds `0` for empty and a player id otherwise.
pub fn line_winner(cells: &[u8], lines: &[[usize; 3]]) -> Option<Player> {
    lines.iter().find_map(|&[a, b, c]| {
        let v = cells[a];
        if v != 0 && v == cells[b] && v == cells[c] {
            Player::from_id(v)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_for() {
        assert_eq!(score_for(7, Player::One, Player::One), 7);
        assert_eq!(score_for(7, Player::One, Player::Two), -7);
    }

    #[test]
    fn test_line_winner() {
        let lines = [[0, 1, 2], [0, 4, 8]];
        assert_eq!(line_winner(&[1, 1, 1, 0, 0, 0, 0, 0, 0], &lines), Some(Player::One));
        assert_eq!(line_winner(&[2, 0, 0, 0, 2, 0, 0, 0, 2], &lines), Some(Player::Two));
        assert_eq!(line_winner(&[1, 2, 1, 0, 0, 0, 0, 0, 0], &lines), None);
    }
}
