//! Feed a canned byte stream through the parser task and print every
//! outcome, the way a network read loop would.
//!
//! Run with: `cargo run --example stream_parser`

use bytes::Bytes;
use clirc_proto::Parser;
use tokio::sync::{broadcast, mpsc};

#[tokio::main]
async fn main() {
    let (chunk_tx, chunk_rx) = mpsc::channel::<Bytes>(16);
    let (msg_tx, mut msg_rx) = mpsc::channel(16);
    let (err_tx, mut err_rx) = mpsc::channel(16);
    let (_cancel_tx, cancel_rx) = broadcast::channel(1);

    let parser = tokio::spawn(Parser::new(chunk_rx, msg_tx, err_tx).run(cancel_rx));

    // chunks arrive with no respect for line boundaries
    let chunks: &[&[u8]] = &[
        b":irc.example.com 001 guest :Wel",
        b"come to the network\r\n@time=12",
        b"345 :dan!d@localhost PRIVMSG #chan :Hey!\r\n",
        b"\x07this line is broken\r\nPING :keepalive\r\n",
    ];
    for chunk in chunks {
        chunk_tx.send(Bytes::from_static(chunk)).await.unwrap();
    }
    drop(chunk_tx);

    while let Some(msg) = msg_rx.recv().await {
        println!("message: {msg}");
    }
    while let Some(err) = err_rx.recv().await {
        println!("rejected: {err} (partial: {})", err.partial);
    }

    parser.await.unwrap().unwrap();
}
