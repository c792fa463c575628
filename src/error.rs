//! Domain errors reported to the client as protocol status tokens.

use derive_more::{Display, Error};

/// A request that could not be honored. Each variant has exactly one wire
/// token; transport failures are not represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// The request needs an active game and none exists.
    #[display("no game in progress")]
    NoGame,
    /// Square occupied, off the board, or brackets nothing; also a wrong
    /// claim that the human has no move.
    #[display("illegal move")]
    IllegalMove,
    /// The requester is not the player due to move.
    #[display("out of turn")]
    OutOfTurn,
    /// Wrong field count or argument shape.
    #[display("invalid format")]
    InvalidFormat,
    /// Command code outside the accepted set.
    #[display("unknown command")]
    UnknownCommand,
}

impl ProtocolError {
    /// Status token, without the trailing newline.
    pub fn code(self) -> &'static str {
        match self {
            ProtocolError::NoGame => "NOGAME",
            ProtocolError::IllegalMove => "ILLMOVE",
            ProtocolError::OutOfTurn => "OOT",
            ProtocolError::InvalidFormat => "INVFMT",
            ProtocolError::UnknownCommand => "UNKCMD",
        }
    }
}
