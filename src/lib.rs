//! Reversi-Rust: a Reversi/Othello game service over a line protocol.
//!
//! A client plays against a computer opponent that picks uniformly at random
//! among its legal moves. Requests are short text lines and every request is
//! answered with a status token or a board dump.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, wire symbols, command codes
//! - [`board`] - Cells, players, squares, and the opening position
//! - [`rules`] - Move legality, flipping, turn order, and scoring
//! - [`opponent`] - Random move selection for the computer
//! - [`protocol`] - Request parsing and the game session state machine
//! - [`error`] - Protocol error codes
//! - [`server`] - Stdio and TCP transports
//! - [`client`] - Interactive client
//!
//! ## Example
//!
//! ```
//! use reversi_rust::protocol::Session;
//!
//! let mut session = Session::with_seed(1);
//! assert_eq!(session.handle_line("00 X\n"), "OK\n");
//! assert_eq!(session.handle_line("02 2 3\n"), "OK\n");
//! assert_eq!(session.handle_line("03\n"), "OK\n");
//! ```

pub mod board;
pub mod client;
pub mod constants;
pub mod error;
pub mod opponent;
pub mod protocol;
pub mod rules;
pub mod server;
