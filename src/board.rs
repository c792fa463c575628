//! Board representation: cells, players, squares, and the opening layout.
//!
//! The grid is stored as a fixed 10x10 array. Row and column 0 and 9 hold
//! [`Cell::Border`] for the lifetime of the board; a [`Square`] can only
//! name one of the 64 playable cells, so the border is never written.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Error};

use crate::constants::{
    DUMP_LEN, DUMP_SEPARATOR, N, PLAYABLE, SYMBOL_BLACK, SYMBOL_BORDER, SYMBOL_EMPTY,
    SYMBOL_WHITE, W,
};

/// One of the two sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Wire symbol (`X` or `O`).
    pub fn symbol(self) -> char {
        match self {
            Player::Black => SYMBOL_BLACK,
            Player::White => SYMBOL_WHITE,
        }
    }

    /// Parse a color-choice argument. Only the exact single-character
    /// symbols are accepted.
    pub fn from_symbol(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(SYMBOL_BLACK), None) => Some(Player::Black),
            (Some(SYMBOL_WHITE), None) => Some(Player::White),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Contents of a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
    Border,
}

impl Cell {
    /// The player whose token occupies this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
            Cell::Empty | Cell::Border => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => SYMBOL_EMPTY,
            Cell::Black => SYMBOL_BLACK,
            Cell::White => SYMBOL_WHITE,
            Cell::Border => SYMBOL_BORDER,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// A playable cell, addressed by grid row and column in `1..=8`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// Returns `None` unless `(row, col)` is inside the playable interior.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if (1..=N).contains(&row) && (1..=N).contains(&col) {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Convert zero-based wire coordinates to a square.
    ///
    /// The wire column selects the grid row and the wire row selects the grid
    /// column, i.e. the linear index is `(col + 1) * 10 + (row + 1)`.
    pub fn from_wire(col: i64, row: i64) -> Option<Self> {
        let grid_row = usize::try_from(col.checked_add(1)?).ok()?;
        let grid_col = usize::try_from(row.checked_add(1)?).ok()?;
        Self::new(grid_row, grid_col)
    }

    /// Build a square from a linear index `row * 10 + col`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::new(index / W, index % W)
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// Zero-based `(col, row)` wire coordinates; inverse of [`Square::from_wire`].
    pub fn to_wire(self) -> (usize, usize) {
        (self.row - 1, self.col - 1)
    }

    /// Linear index into the flattened 10x10 grid.
    pub fn index(self) -> usize {
        self.row * W + self.col
    }

    /// All 64 playable squares in increasing linear index.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..W * W).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (col, row) = self.to_wire();
        write!(f, "({col},{row})")
    }
}

/// Error returned when a textual board layout cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ParseBoardError {
    #[display("unexpected board symbol {_0:?}")]
    BadSymbol(#[error(not(source))] char),
    #[display("expected 64 cells, found {_0}")]
    WrongLength(#[error(not(source))] usize),
}

/// The 10x10 grid with sentinel border.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    cells: [[Cell; W]; W],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create the standard opening position: two tokens per color on the
    /// central diagonals.
    pub fn new() -> Self {
        let mut board = Self::empty();
        let (lo, hi) = (N / 2, N / 2 + 1);
        board.cells[lo][lo] = Cell::White;
        board.cells[hi][hi] = Cell::White;
        board.cells[lo][hi] = Cell::Black;
        board.cells[hi][lo] = Cell::Black;
        board
    }

    /// A board with every playable cell empty.
    pub fn empty() -> Self {
        let mut cells = [[Cell::Border; W]; W];
        for row in cells.iter_mut().take(N + 1).skip(1) {
            for cell in row.iter_mut().take(N + 1).skip(1) {
                *cell = Cell::Empty;
            }
        }
        Self { cells }
    }

    pub fn get(&self, sq: Square) -> Cell {
        self.cells[sq.row][sq.col]
    }

    /// Place a token on a playable square.
    pub fn set(&mut self, sq: Square, player: Player) {
        self.cells[sq.row][sq.col] = player.into();
    }

    /// Bounds-checked lookup by signed grid coordinates. Anything outside
    /// the 10x10 grid reads as border.
    pub fn at(&self, row: isize, col: isize) -> Cell {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            return Cell::Border;
        };
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Border)
    }

    /// Wire form of the board: 64 cell symbols in row-major order, a tab,
    /// the symbol of the player to move next, and a newline.
    pub fn dump(&self, next: Player) -> String {
        let mut out = String::with_capacity(DUMP_LEN);
        for sq in Square::all() {
            out.push(self.get(sq).symbol());
        }
        out.push(DUMP_SEPARATOR);
        out.push(next.symbol());
        out.push('\n');
        out
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parse 64 cell symbols (`X`, `O`, `-`), ignoring whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::empty();
        let mut squares = Square::all();
        let mut count = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = match ch {
                SYMBOL_BLACK => Cell::Black,
                SYMBOL_WHITE => Cell::White,
                SYMBOL_EMPTY => Cell::Empty,
                other => return Err(ParseBoardError::BadSymbol(other)),
            };
            count += 1;
            let Some(sq) = squares.next() else {
                continue;
            };
            board.cells[sq.row][sq.col] = cell;
        }
        if count != PLAYABLE {
            return Err(ParseBoardError::WrongLength(count));
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=N {
            for col in 1..=N {
                write!(f, "{} ", self.cells[row][col].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
