//! Line transport for the game session.
//!
//! The session is a single shared resource. A client holds it from attach
//! to detach; over TCP a second client that connects while the session is
//! held is turned away by closing its connection. Requests from the attached
//! client are handled one at a time, in arrival order.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::constants::MAX_LINE_LEN;
use crate::error::ProtocolError;
use crate::protocol::{Session, render};

/// Serve one attached client until its input ends.
///
/// Any game left over from a previous client is discarded on attach.
/// A line that is not UTF-8 or runs past `MAX_LINE_LEN` bytes is answered
/// with `INVFMT` and the session carries on.
/// Returns the number of requests handled.
pub fn serve_session<R: BufRead, W: Write>(
    session: &mut Session,
    mut reader: R,
    mut writer: W,
) -> Result<usize> {
    session.reset();
    info!("client attached");

    let mut handled = 0;
    let mut buf = Vec::with_capacity(MAX_LINE_LEN);
    loop {
        buf.clear();
        let n = reader
            .by_ref()
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', &mut buf)
            .context("failed to read request")?;
        if n == 0 {
            break;
        }

        let response = if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') {
            let skipped = reader
                .skip_until(b'\n')
                .context("failed to read request")?;
            warn!(len = n + skipped, "request line too long");
            render(&Err(ProtocolError::InvalidFormat))
        } else {
            match std::str::from_utf8(&buf) {
                Ok(line) => session.handle_line(line),
                Err(e) => {
                    warn!(error = %e, "request is not valid UTF-8");
                    render(&Err(ProtocolError::InvalidFormat))
                }
            }
        };

        writer
            .write_all(response.as_bytes())
            .context("failed to write response")?;
        writer.flush().context("failed to flush response")?;
        handled += 1;
    }

    info!(requests = handled, "client detached");
    Ok(handled)
}

/// Serve a single client on stdin/stdout.
pub fn run_stdio(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_session(session, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// TCP front end sharing one session between all connections.
pub struct Server {
    listener: TcpListener,
    session: Arc<Mutex<Session>>,
}

impl Server {
    pub fn bind<A: ToSocketAddrs>(addr: A, session: Session) -> Result<Self> {
        let listener = TcpListener::bind(addr).context("failed to bind listener")?;
        Ok(Self {
            listener,
            session: Arc::new(Mutex::new(session)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read listener address")
    }

    /// Accept connections forever, one thread per connection.
    pub fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "listening");
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                    continue;
                }
            };
            let session = Arc::clone(&self.session);
            thread::spawn(move || {
                if let Err(e) = handle_connection(stream, &session) {
                    error!(error = %e, "connection failed");
                }
            });
        }
        Ok(())
    }
}

fn handle_connection(stream: TcpStream, session: &Mutex<Session>) -> Result<()> {
    let peer = stream.peer_addr().ok();
    let mut guard = match session.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => {
            warn!(?peer, "session busy, rejecting client");
            return Ok(());
        }
        Err(TryLockError::Poisoned(poisoned)) => {
            warn!(?peer, "previous client panicked, taking over session");
            poisoned.into_inner()
        }
    };

    info!(?peer, "connection accepted");
    let reader = BufReader::new(stream.try_clone().context("failed to clone stream")?);
    serve_session(&mut guard, reader, stream)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(session: &mut Session, input: &str) -> String {
        run_bytes(session, input.as_bytes())
    }

    fn run_bytes(session: &mut Session, input: &[u8]) -> String {
        let mut out = Vec::new();
        serve_session(session, Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_one_response_per_line() {
        let mut session = Session::with_seed(9);
        let out = run(&mut session, "01\n00 X\n02 2 3\n05\n00 1 2 3\n");
        assert_eq!(out, "NOGAME\nOK\nOK\nUNKCMD\nINVFMT\n");
    }

    #[test]
    fn test_attach_resets_game() {
        let mut session = Session::with_seed(9);
        run(&mut session, "00 O\n");
        assert!(session.is_active());
        let out = run(&mut session, "01\n");
        assert_eq!(out, "NOGAME\n");
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut session = Session::with_seed(9);
        let out = run(&mut session, "00 X\n01");
        assert!(out.starts_with("OK\n"));
        assert!(out.ends_with("\tX\n"));
    }

    #[test]
    fn test_invalid_utf8_answered_and_session_kept() {
        let mut session = Session::with_seed(9);
        let mut input = b"00 X\n".to_vec();
        input.extend_from_slice(&[0x30, 0xff, b'\n']);
        input.extend_from_slice(b"01\n");

        let out = run_bytes(&mut session, &input);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("OK"));
        assert_eq!(lines.next(), Some("INVFMT"));
        assert!(out.ends_with("\tX\n"));
        assert!(session.is_active());
    }

    #[test]
    fn test_overlong_line_rejected() {
        let mut session = Session::with_seed(9);
        let long = format!("00 X{}\n", " ".repeat(10_000));
        let out = run(&mut session, &format!("{long}01\n00 X\n"));
        assert_eq!(out, "INVFMT\nNOGAME\nOK\n");
    }

    #[test]
    fn test_line_at_length_limit() {
        let mut session = Session::with_seed(9);
        // Exactly the limit, newline included, still reaches the parser.
        let padded = format!("02 {:0>width$} 3\n", 2, width = MAX_LINE_LEN - 6);
        assert_eq!(padded.len(), MAX_LINE_LEN);
        let out = run(&mut session, &format!("00 X\n{padded}"));
        assert_eq!(out, "OK\nOK\n");
    }
}
