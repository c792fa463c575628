//! Interactive client for the line protocol.
//!
//! Reads commands from the user, forwards them to the server, and prints
//! the responses. Board dumps are checked and shown as an 8x8 grid.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};

use anyhow::{Context, Result, bail, ensure};
use tracing::debug;

use crate::constants::{
    CLIENT_QUIT, CMD_QUERY, DUMP_LEN, DUMP_SEPARATOR, N, PLAYABLE, SYMBOL_BLACK, SYMBOL_EMPTY,
    SYMBOL_WHITE,
};

/// Connection to a server: a buffered reader for responses and a writer
/// for requests.
pub struct Client<R, W> {
    reader: R,
    writer: W,
}

impl Client<BufReader<TcpStream>, TcpStream> {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr).context("failed to connect to server")?;
        let reader = BufReader::new(stream.try_clone().context("failed to clone stream")?);
        Ok(Self::new(reader, stream))
    }
}

impl<R: BufRead, W: Write> Client<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Send one request and wait for its response line.
    ///
    /// The newline is appended if missing. The response keeps its newline.
    pub fn request(&mut self, line: &str) -> Result<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        writeln!(self.writer, "{line}").context("failed to send request")?;
        self.writer.flush().context("failed to send request")?;

        let mut response = String::new();
        let n = self
            .reader
            .read_line(&mut response)
            .context("failed to read response")?;
        if n == 0 {
            bail!("server closed the connection");
        }
        debug!(request = line, response = response.trim_end(), "round trip");
        Ok(response)
    }
}

/// Check a board dump and lay it out as 8 rows followed by the next player.
pub fn format_board(dump: &str) -> Result<String> {
    ensure!(
        dump.len() == DUMP_LEN,
        "board response of invalid length: {}",
        dump.len()
    );
    let bytes = dump.as_bytes();
    let is_player = |b: u8| b == SYMBOL_BLACK as u8 || b == SYMBOL_WHITE as u8;
    ensure!(
        bytes[..PLAYABLE]
            .iter()
            .all(|&b| is_player(b) || b == SYMBOL_EMPTY as u8),
        "board response has invalid cells"
    );
    ensure!(
        bytes[PLAYABLE] == DUMP_SEPARATOR as u8
            && is_player(bytes[PLAYABLE + 1])
            && bytes[PLAYABLE + 2] == b'\n',
        "board response has invalid trailer"
    );

    let mut out = String::new();
    for row in dump[..PLAYABLE].as_bytes().chunks(N) {
        out.push_str(&String::from_utf8_lossy(row));
        out.push('\n');
    }
    out.push_str(&format!("Next turn: {}\n", bytes[PLAYABLE + 1] as char));
    Ok(out)
}

/// Prompt for commands on `input` until EOF or `QUIT`, echoing responses
/// to `output`.
pub fn run_interactive<R, W, I, O>(client: &mut Client<R, W>, input: I, mut output: O) -> Result<()>
where
    R: BufRead,
    W: Write,
    I: BufRead,
    O: Write,
{
    let mut lines = input.lines();
    loop {
        write!(output, "Enter a command (enter {CLIENT_QUIT} to exit): ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;
        if line == CLIENT_QUIT {
            break;
        }

        let response = client.request(&line)?;
        if line == CMD_QUERY && response.len() == DUMP_LEN {
            write!(output, "{}", format_board(&response)?)?;
        } else {
            writeln!(output, "{}", response.trim_end())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::board::{Board, Player};

    #[test]
    fn test_format_board_opening() {
        let dump = Board::new().dump(Player::Black);
        let text = format_board(&dump).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[3], "---OX---");
        assert_eq!(lines[4], "---XO---");
        assert_eq!(lines[8], "Next turn: X");
    }

    #[test]
    fn test_format_board_rejects_bad_dump() {
        assert!(format_board("OK\n").is_err());
        let mut dump = Board::new().dump(Player::White);
        dump.replace_range(0..1, "#");
        assert!(format_board(&dump).is_err());
        let dump = Board::new().dump(Player::White).replace('\t', " ");
        assert!(format_board(&dump).is_err());
    }

    #[test]
    fn test_request_reads_one_line() {
        let mut sent = Vec::new();
        let mut client = Client::new(Cursor::new("OK\nNOGAME\n"), &mut sent);
        assert_eq!(client.request("00 X").unwrap(), "OK\n");
        assert_eq!(client.request("01\n").unwrap(), "NOGAME\n");
        assert!(client.request("01").is_err());
        drop(client);
        assert_eq!(String::from_utf8(sent).unwrap(), "00 X\n01\n01\n");
    }

    #[test]
    fn test_interactive_quit() {
        let replies = format!("OK\n{}", Board::new().dump(Player::Black));
        let mut sent = Vec::new();
        let mut client = Client::new(Cursor::new(replies), &mut sent);
        let mut shown = Vec::new();
        run_interactive(
            &mut client,
            Cursor::new("00 X\n01\nQUIT\n02 2 3\n"),
            &mut shown,
        )
        .unwrap();
        drop(client);

        let shown = String::from_utf8(shown).unwrap();
        assert!(shown.contains("OK\n"));
        assert!(shown.contains("---XO---\n"));
        assert!(shown.contains("Next turn: X\n"));
        assert_eq!(String::from_utf8(sent).unwrap(), "00 X\n01\n");
    }
}
