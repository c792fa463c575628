//! TCP transport tests: request/response over a socket and the single
//! session lock.

use std::io::Read;
use std::net::{SocketAddr, TcpStream};
use std::thread;

use reversi_rust::client::{Client, format_board};
use reversi_rust::protocol::Session;
use reversi_rust::server::Server;

fn start_server(seed: u64) -> SocketAddr {
    let server = Server::bind("127.0.0.1:0", Session::with_seed(seed)).unwrap();
    let addr = server.local_addr().unwrap();
    thread::spawn(move || server.run());
    addr
}

#[test]
fn test_round_trip_over_tcp() {
    let addr = start_server(11);
    let mut client = Client::connect(addr).unwrap();

    assert_eq!(client.request("01").unwrap(), "NOGAME\n");
    assert_eq!(client.request("00 X").unwrap(), "OK\n");
    assert_eq!(client.request("02 2 3").unwrap(), "OK\n");
    assert_eq!(client.request("03").unwrap(), "OK\n");

    let dump = client.request("01").unwrap();
    let text = format_board(&dump).unwrap();
    assert!(text.ends_with("Next turn: X\n"));

    assert_eq!(client.request("99").unwrap(), "UNKCMD\n");
    assert_eq!(client.request("00 1 2 3").unwrap(), "INVFMT\n");
}

#[test]
fn test_second_client_rejected_while_attached() {
    let addr = start_server(12);
    let mut first = Client::connect(addr).unwrap();
    // A round trip guarantees the first client holds the session.
    assert_eq!(first.request("00 O").unwrap(), "OK\n");

    let mut second = TcpStream::connect(addr).unwrap();
    let mut buf = Vec::new();
    let n = second.read_to_end(&mut buf).unwrap();
    assert_eq!(n, 0, "rejected client should see the connection closed");

    // The first client's game is untouched.
    assert_eq!(first.request("03").unwrap(), "OK\n");
}

#[test]
fn test_session_free_after_detach() {
    let addr = start_server(13);
    {
        let mut first = Client::connect(addr).unwrap();
        assert_eq!(first.request("00 X").unwrap(), "OK\n");
    }

    // The detach is processed asynchronously; retry until the lock is free.
    for _ in 0..50 {
        let Ok(mut client) = Client::connect(addr) else {
            continue;
        };
        match client.request("01") {
            // A new attachment starts without a game.
            Ok(response) => {
                assert_eq!(response, "NOGAME\n");
                return;
            }
            Err(_) => thread::sleep(std::time::Duration::from_millis(20)),
        }
    }
    panic!("session was never released");
}
