//! Constants for board geometry, wire symbols, and server defaults.
//!
//! The board is a 10x10 grid: an 8x8 playable interior surrounded by a
//! one-cell sentinel border. Directional searches stop when they reach the
//! border, so no explicit edge checks are needed in the rules.

// =============================================================================
// Board Geometry
// =============================================================================

/// Playable board size (NxN).
pub const N: usize = 8;

/// Board width including the sentinel border on both sides.
pub const W: usize = N + 2;

/// Number of playable cells.
pub const PLAYABLE: usize = N * N;

/// Row/column deltas for the 8 compass directions.
/// Order: NW, N, NE, W, E, SW, S, SE
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// =============================================================================
// Wire Symbols
// =============================================================================

/// Black token, also the color that moves first.
pub const SYMBOL_BLACK: char = 'X';

/// White token.
pub const SYMBOL_WHITE: char = 'O';

/// Empty playable cell.
pub const SYMBOL_EMPTY: char = '-';

/// Sentinel border cell (never sent over the wire).
pub const SYMBOL_BORDER: char = '#';

/// Separator between the cells and the next-player indicator in a board dump.
pub const DUMP_SEPARATOR: char = '\t';

/// Length of a board dump in bytes: 64 cells, separator, next player, newline.
pub const DUMP_LEN: usize = PLAYABLE + 3;

// =============================================================================
// Command Codes
// =============================================================================

/// Every accepted command code.
pub const COMMAND_CODES: [&str; 5] = ["00", "01", "02", "03", "04"];

/// Zero-argument query of the board.
pub const CMD_QUERY: &str = "01";

/// Zero-argument request for the computer to take its turn.
pub const CMD_ADVANCE: &str = "03";

/// Zero-argument claim that the human has no legal move.
pub const CMD_CLAIM_PASS: &str = "04";

/// Maximum number of fields in a request (code plus two arguments).
pub const MAX_FIELDS: usize = 3;

/// Longest request line accepted, newline included. Longer lines are
/// discarded and answered with `INVFMT`.
pub const MAX_LINE_LEN: usize = 64;

// =============================================================================
// Server Defaults
// =============================================================================

/// Default TCP address for `serve` and `client`.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";

/// Client-side command that ends the interactive loop without touching the server.
pub const CLIENT_QUIT: &str = "QUIT";
