//! The computer opponent: a uniformly random choice among legal moves.
//!
//! There is no lookahead and no weighting. Candidates are enumerated in
//! increasing linear index so that a seeded generator reproduces the same
//! game.

use crate::board::{Board, Player, Square};
use crate::rules::legal_moves;

/// Random move picker.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPolicy {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Deterministic picker for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Choose a legal move for `player`, or `None` if it has none.
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Option<Square> {
        let candidates = legal_moves(board, player);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.usize(..candidates.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::is_legal;

    #[test]
    fn test_choose_move_is_legal() {
        let board = Board::new();
        let mut policy = RandomPolicy::with_seed(7);
        for _ in 0..50 {
            let sq = policy.choose_move(&board, Player::Black).unwrap();
            assert!(is_legal(&board, sq, Player::Black));
        }
    }

    #[test]
    fn test_choose_move_covers_all_candidates() {
        let board = Board::new();
        let mut policy = RandomPolicy::with_seed(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(policy.choose_move(&board, Player::White).unwrap());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut a = RandomPolicy::with_seed(42);
        let mut b = RandomPolicy::with_seed(42);
        for _ in 0..20 {
            assert_eq!(
                a.choose_move(&board, Player::Black),
                b.choose_move(&board, Player::Black)
            );
        }
    }

    #[test]
    fn test_no_moves() {
        let board = Board::empty();
        let mut policy = RandomPolicy::with_seed(3);
        assert_eq!(policy.choose_move(&board, Player::Black), None);
    }
}
