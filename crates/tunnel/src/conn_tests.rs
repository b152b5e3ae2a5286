// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn ws_pair() -> (WsConn<tokio::io::DuplexStream>, WsConn<tokio::io::DuplexStream>) {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let client_fut = tokio_tungstenite::client_async("ws://local/", client_io);
    let server_fut = tokio_tungstenite::accept_async(server_io);
    let (client_res, server_res) = tokio::join!(client_fut, server_fut);
    let (client_ws, _) = client_res.expect("client handshake");
    let server_ws = server_res.expect("server handshake");
    (WsConn::new(client_ws), WsConn::new(server_ws))
}

#[tokio::test]
async fn round_trips_bytes_in_both_directions() {
    let (mut client, mut server) = ws_pair().await;

    client.write_all(b"hello from client").await.unwrap();
    client.flush().await.unwrap();
    let mut buf = vec![0u8; 18];
    server.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"hello from client");

    server.write_all(b"hi back").await.unwrap();
    server.flush().await.unwrap();
    let mut buf2 = vec![0u8; 7];
    client.read_exact(&mut buf2).await.unwrap();
    assert_eq!(&buf2, b"hi back");
}

#[tokio::test]
async fn reassembles_reads_split_across_poll_calls() {
    let (mut client, mut server) = ws_pair().await;

    client.write_all(b"part-one").await.unwrap();
    client.flush().await.unwrap();
    client.write_all(b"part-two").await.unwrap();
    client.flush().await.unwrap();

    let mut buf = vec![0u8; 16];
    server.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"part-onepart-two");
}
