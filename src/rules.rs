//! Game rules: move legality, token flipping, turn order, and scoring.
//!
//! Legality is a directional bracket search. From an empty square, each of
//! the 8 directions is walked over a maximal run of opponent tokens; the run
//! is flippable only if the walk ends on one of the mover's own tokens. The
//! sentinel border terminates a walk exactly like an empty cell does.

use crate::board::{Board, Cell, Player, Square};
use crate::constants::DIRECTIONS;

/// Who moves after a turn has been played.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NextTurn {
    /// The given player has at least one legal move and is due to play.
    Move(Player),
    /// Neither side can move.
    GameOver,
}

/// Find the bracket for a move at `sq` in direction `(dr, dc)`.
///
/// Returns the number of opponent tokens between `sq` and the bracket, or
/// `None` if the direction does not bracket anything. A direction whose
/// immediate neighbor is not an opponent token is rejected without walking.
fn bracket_run(
    board: &Board,
    sq: Square,
    player: Player,
    (dr, dc): (isize, isize),
) -> Option<usize> {
    let opp: Cell = player.opponent().into();
    let own: Cell = player.into();

    let mut row = sq.row() as isize + dr;
    let mut col = sq.col() as isize + dc;
    let mut run = 0;
    while board.at(row, col) == opp {
        run += 1;
        row += dr;
        col += dc;
    }

    if run > 0 && board.at(row, col) == own {
        Some(run)
    } else {
        None
    }
}

/// Check whether `player` may play at `sq`.
///
/// The square must be empty and at least one direction must bracket a run
/// of opponent tokens.
pub fn is_legal(board: &Board, sq: Square, player: Player) -> bool {
    board.get(sq) == Cell::Empty
        && DIRECTIONS
            .iter()
            .any(|&dir| bracket_run(board, sq, player, dir).is_some())
}

/// Play a validated move: place the token and flip every bracketed run.
///
/// Returns the number of tokens flipped. The caller must have checked the
/// move with [`is_legal`]; on an unchecked square this still never touches
/// the border, but the resulting position is not one reachable in play.
pub fn play_move(board: &mut Board, sq: Square, player: Player) -> usize {
    // Brackets are computed against the position before the token lands so
    // that one direction's flips cannot create a bracket for another.
    let runs: Vec<((isize, isize), usize)> = DIRECTIONS
        .iter()
        .filter_map(|&dir| bracket_run(board, sq, player, dir).map(|run| (dir, run)))
        .collect();

    board.set(sq, player);

    let mut flipped = 0;
    for ((dr, dc), run) in runs {
        for step in 1..=run as isize {
            let target = Square::new(
                (sq.row() as isize + dr * step) as usize,
                (sq.col() as isize + dc * step) as usize,
            );
            if let Some(target) = target {
                board.set(target, player);
                flipped += 1;
            }
        }
    }
    flipped
}

/// All legal squares for `player`, in increasing linear index.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Square> {
    Square::all()
        .filter(|&sq| is_legal(board, sq, player))
        .collect()
}

/// True if `player` has at least one legal move.
pub fn has_legal_move(board: &Board, player: Player) -> bool {
    Square::all().any(|sq| is_legal(board, sq, player))
}

/// Decide who moves after `last_mover`.
///
/// The opponent moves if it can; otherwise the opponent passes and
/// `last_mover` plays again; if neither side can move the game is over.
pub fn next_turn(board: &Board, last_mover: Player) -> NextTurn {
    let opp = last_mover.opponent();
    if has_legal_move(board, opp) {
        NextTurn::Move(opp)
    } else if has_legal_move(board, last_mover) {
        NextTurn::Move(last_mover)
    } else {
        NextTurn::GameOver
    }
}

/// Token counts as `(black, white)`.
pub fn count(board: &Board) -> (usize, usize) {
    Square::all().fold((0, 0), |(black, white), sq| match board.get(sq).player() {
        Some(Player::Black) => (black + 1, white),
        Some(Player::White) => (black, white + 1),
        None => (black, white),
    })
}

/// Tokens held by `perspective` minus tokens held by its opponent.
pub fn differential(board: &Board, perspective: Player) -> i32 {
    let (black, white) = count(board);
    let diff = black as i32 - white as i32;
    match perspective {
        Player::Black => diff,
        Player::White => -diff,
    }
}
