//! Line protocol and game session state machine.
//!
//! A request is one line of space-separated fields: a two-digit command code
//! followed by zero, one, or two arguments. Every request produces exactly
//! one newline-terminated response.
//!
//! ## Requests
//!
//! - `01` - Return the board dump
//! - `03` - Let the computer take its turn
//! - `04` - Claim the human has no legal move
//! - `<code> X|O` - Start a new game as the given color
//! - `<code> <col> <row>` - Play a move at zero-based `(col, row)`
//!
//! Any of the codes `00`..`04` is accepted for the one- and two-argument
//! forms; only the argument count selects the behavior there.
//!
//! ## Responses
//!
//! `OK`, `WIN`, `TIE`, `LOSE`, `NOGAME`, `ILLMOVE`, `OOT`, `UNKCMD`,
//! `INVFMT`, or a board dump (see [`Board::dump`]).

use tracing::{debug, info, instrument};

use crate::board::{Board, Player, Square};
use crate::constants::{CMD_ADVANCE, CMD_CLAIM_PASS, CMD_QUERY, COMMAND_CODES, MAX_FIELDS};
use crate::error::ProtocolError;
use crate::opponent::RandomPolicy;
use crate::rules::{differential, is_legal, next_turn, play_move, NextTurn};

/// A tokenized request: a command code and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub cmd: String,
    pub args: Vec<String>,
}

impl Request {
    /// Split a request line into fields.
    ///
    /// The line terminator is stripped first. The field count is checked
    /// before the command code, so a four-field line is always
    /// [`ProtocolError::InvalidFormat`].
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.is_empty() || fields.len() > MAX_FIELDS {
            return Err(ProtocolError::InvalidFormat);
        }
        if !COMMAND_CODES.contains(&fields[0]) {
            return Err(ProtocolError::UnknownCommand);
        }
        Ok(Self {
            cmd: fields[0].to_string(),
            args: fields[1..].iter().map(|s| s.to_string()).collect(),
        })
    }
}

/// A request with its arguments validated and typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Query,
    Advance,
    ClaimPass,
    Choose(Player),
    Move { col: i64, row: i64 },
}

impl TryFrom<Request> for Command {
    type Error = ProtocolError;

    fn try_from(req: Request) -> Result<Self, Self::Error> {
        match req.args.as_slice() {
            [] => match req.cmd.as_str() {
                CMD_QUERY => Ok(Command::Query),
                CMD_ADVANCE => Ok(Command::Advance),
                CMD_CLAIM_PASS => Ok(Command::ClaimPass),
                _ => Err(ProtocolError::InvalidFormat),
            },
            [color] => Player::from_symbol(color)
                .map(Command::Choose)
                .ok_or(ProtocolError::InvalidFormat),
            [col, row] => match (col.parse(), row.parse()) {
                (Ok(col), Ok(row)) => Ok(Command::Move { col, row }),
                _ => Err(ProtocolError::InvalidFormat),
            },
            _ => Err(ProtocolError::InvalidFormat),
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Win,
    Tie,
    Lose,
    /// Board dump, already newline-terminated.
    Board(String),
}

impl Reply {
    /// Final result from a differential taken from the human's side.
    pub fn outcome(differential: i32) -> Self {
        match differential {
            d if d > 0 => Reply::Win,
            0 => Reply::Tie,
            _ => Reply::Lose,
        }
    }
}

pub type Response = Result<Reply, ProtocolError>;

/// Wire form of a response, always newline-terminated.
pub fn render(response: &Response) -> String {
    match response {
        Ok(Reply::Ok) => "OK\n".to_string(),
        Ok(Reply::Win) => "WIN\n".to_string(),
        Ok(Reply::Tie) => "TIE\n".to_string(),
        Ok(Reply::Lose) => "LOSE\n".to_string(),
        Ok(Reply::Board(dump)) => dump.clone(),
        Err(e) => format!("{}\n", e.code()),
    }
}

/// State of the active game.
#[derive(Debug, Clone)]
struct Game {
    board: Board,
    human: Player,
    computer: Player,
    last_mover: Player,
}

impl Game {
    fn new(human: Player) -> Self {
        let computer = human.opponent();
        // Black opens, so the next turn must belong to Black.
        let last_mover = if human == Player::Black {
            computer
        } else {
            human
        };
        Self {
            board: Board::new(),
            human,
            computer,
            last_mover,
        }
    }
}

/// One client's view of the service: at most one game at a time.
pub struct Session {
    game: Option<Game>,
    last_score: Option<i32>,
    policy: RandomPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_policy(RandomPolicy::new())
    }

    /// Session whose computer moves are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_policy(RandomPolicy::with_seed(seed))
    }

    pub fn with_policy(policy: RandomPolicy) -> Self {
        Self {
            game: None,
            last_score: None,
            policy,
        }
    }

    /// Drop any game in progress, as when a new client attaches.
    pub fn reset(&mut self) {
        if self.game.take().is_some() {
            info!("discarding unfinished game");
        }
    }

    pub fn is_active(&self) -> bool {
        self.game.is_some()
    }

    /// Board of the active game.
    pub fn board(&self) -> Option<&Board> {
        self.game.as_ref().map(|g| &g.board)
    }

    /// Color played by the human in the active game.
    pub fn human(&self) -> Option<Player> {
        self.game.as_ref().map(|g| g.human)
    }

    /// Differential (human's side) of the most recently finished game.
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }

    /// Handle one request line and return the wire response.
    #[instrument(level = "debug", skip(self))]
    pub fn handle_line(&mut self, line: &str) -> String {
        let response = Request::parse(line)
            .and_then(Command::try_from)
            .and_then(|cmd| self.execute(cmd));
        let out = render(&response);
        debug!(response = out.trim_end(), "handled request");
        out
    }

    /// Execute a typed command against the session.
    pub fn execute(&mut self, cmd: Command) -> Response {
        match cmd {
            Command::Query => self.query(),
            Command::Advance => self.advance(),
            Command::ClaimPass => self.claim_pass(),
            Command::Choose(player) => Ok(self.start(player)),
            Command::Move { col, row } => self.play(col, row),
        }
    }

    fn query(&self) -> Response {
        let game = self.game.as_ref().ok_or(ProtocolError::NoGame)?;
        let next = match next_turn(&game.board, game.last_mover) {
            NextTurn::Move(player) => player,
            NextTurn::GameOver => game.last_mover.opponent(),
        };
        Ok(Reply::Board(game.board.dump(next)))
    }

    fn start(&mut self, human: Player) -> Reply {
        self.reset();
        self.game = Some(Game::new(human));
        info!(human = %human, "new game");
        Reply::Ok
    }

    fn advance(&mut self) -> Response {
        let game = self.game.as_mut().ok_or(ProtocolError::NoGame)?;
        match next_turn(&game.board, game.last_mover) {
            NextTurn::Move(player) if player == game.computer => {
                if let Some(sq) = self.policy.choose_move(&game.board, player) {
                    let flipped = play_move(&mut game.board, sq, player);
                    debug!(square = %sq, flipped, "computer move");
                }
                game.last_mover = player;
                Ok(Reply::Ok)
            }
            // Either the computer has nothing to play or the human simply
            // has not moved yet. The human's turn is never skipped.
            NextTurn::Move(_) => Err(ProtocolError::OutOfTurn),
            NextTurn::GameOver => self.finish(),
        }
    }

    fn claim_pass(&mut self) -> Response {
        let game = self.game.as_mut().ok_or(ProtocolError::NoGame)?;
        match next_turn(&game.board, game.last_mover) {
            NextTurn::Move(player) if player == game.computer => {
                game.last_mover = game.human;
                Ok(Reply::Ok)
            }
            NextTurn::Move(_) => Err(ProtocolError::IllegalMove),
            NextTurn::GameOver => self.finish(),
        }
    }

    fn play(&mut self, col: i64, row: i64) -> Response {
        let game = self.game.as_mut().ok_or(ProtocolError::NoGame)?;
        match next_turn(&game.board, game.last_mover) {
            NextTurn::Move(player) if player == game.human => {
                let sq = Square::from_wire(col, row)
                    .filter(|&sq| is_legal(&game.board, sq, player))
                    .ok_or(ProtocolError::IllegalMove)?;
                let flipped = play_move(&mut game.board, sq, player);
                game.last_mover = player;
                debug!(square = %sq, flipped, "human move");
                Ok(Reply::Ok)
            }
            NextTurn::Move(_) => Err(ProtocolError::OutOfTurn),
            NextTurn::GameOver => self.finish(),
        }
    }

    /// Score the finished game from the human's side and discard the board.
    fn finish(&mut self) -> Response {
        let game = self.game.take().ok_or(ProtocolError::NoGame)?;
        let score = differential(&game.board, game.human);
        self.last_score = Some(score);
        let reply = Reply::outcome(score);
        info!(score, result = ?reply, "game over");
        Ok(reply)
    }
}
