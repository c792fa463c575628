//! Reversi-Rust: Reversi against a random computer opponent.
//!
//! ## Usage
//!
//! - `reversi-rust` - Play a demo game
//! - `reversi-rust stdio` - Serve one session on stdin/stdout
//! - `reversi-rust serve` - Serve over TCP
//! - `reversi-rust client` - Connect to a TCP server interactively
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reversi_rust::board::Player;
use reversi_rust::client::{Client, run_interactive};
use reversi_rust::constants::DEFAULT_ADDR;
use reversi_rust::opponent::RandomPolicy;
use reversi_rust::protocol::Session;
use reversi_rust::server::{Server, run_stdio};

/// Reversi-Rust: Reversi over a line protocol
#[derive(Parser)]
#[command(name = "reversi-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve a single session on stdin/stdout
    Stdio {
        /// Seed for the computer's move choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Listen for TCP clients; one client holds the session at a time
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,
        /// Seed for the computer's move choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Connect to a server and play interactively
    Client {
        /// Server address
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,
    },
    /// Play a full game with random moves on both sides
    Demo {
        /// Seed for both sides' move choice
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Stdio { seed }) => run_stdio(&mut new_session(seed)),
        Some(Commands::Serve { addr, seed }) => Server::bind(addr, new_session(seed))?.run(),
        Some(Commands::Client { addr }) => {
            let mut client = Client::connect(addr)?;
            run_interactive(&mut client, io::stdin().lock(), io::stdout())
        }
        Some(Commands::Demo { seed }) => run_demo(seed),
        None => run_demo(None),
    }
}

fn new_session(seed: Option<u64>) -> Session {
    match seed {
        Some(seed) => Session::with_seed(seed),
        None => Session::new(),
    }
}

fn run_demo(seed: Option<u64>) -> Result<()> {
    println!("Reversi-Rust: random play against the computer\n");

    let mut session = new_session(seed);
    let mut human = match seed {
        Some(seed) => RandomPolicy::with_seed(seed.wrapping_add(1)),
        None => RandomPolicy::new(),
    };

    let mut response = session.handle_line("00 X");
    let mut requests = 1;
    let mut final_board = None;
    while let Some(board) = session.board().cloned() {
        let request = match human.choose_move(&board, Player::Black) {
            Some(sq) => {
                let (col, row) = sq.to_wire();
                format!("02 {col} {row}")
            }
            None => "04".to_string(),
        };
        response = session.handle_line(&request);
        requests += 1;
        final_board = Some(board);
        if let Some(board) = session.board() {
            final_board = Some(board.clone());
            response = session.handle_line("03");
            requests += 1;
        }
    }

    if let Some(board) = final_board {
        println!("{board}");
    }
    println!("Result after {requests} requests: {}", response.trim_end());
    if let Some(score) = session.last_score() {
        println!("Final differential (X): {score:+}");
    }
    Ok(())
}
