// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn successful_upgrade_sends_request_and_checks_101() {
    let (hub_side, mut agent_side) = tokio::io::duplex(1024);

    let hub_task = tokio::spawn(async move { upgrade(hub_side).await });

    let mut request = vec![0u8; REQUEST.len()];
    agent_side.read_exact(&mut request).await.unwrap();
    assert_eq!(&request, REQUEST);

    agent_side.write_all(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: ssh-tunnel\r\n\r\n").await.unwrap();

    let mut conn = hub_task.await.unwrap().unwrap();
    // No SSH bytes yet buffered.
    drop(agent_side);
    let mut buf = [0u8; 1];
    assert_eq!(conn.read(&mut buf).await.unwrap(), 0);
}

#[tokio::test]
async fn bytes_written_past_the_header_terminator_are_preserved() {
    let (hub_side, mut agent_side) = tokio::io::duplex(1024);
    let hub_task = tokio::spawn(async move { upgrade(hub_side).await });

    let mut request = vec![0u8; REQUEST.len()];
    agent_side.read_exact(&mut request).await.unwrap();

    // The agent's sshd starts writing its version banner in the very same
    // write as the 101 response.
    let mut response = b"HTTP/1.1 101 Switching Protocols\r\n\r\n".to_vec();
    response.extend_from_slice(b"SSH-2.0-OpenSSH_9.0\r\n");
    agent_side.write_all(&response).await.unwrap();

    let mut conn = hub_task.await.unwrap().unwrap();
    let mut got = vec![0u8; b"SSH-2.0-OpenSSH_9.0\r\n".len()];
    conn.read_exact(&mut got).await.unwrap();
    assert_eq!(got, b"SSH-2.0-OpenSSH_9.0\r\n");
}

#[tokio::test]
async fn non_101_status_is_rejected() {
    let (hub_side, mut agent_side) = tokio::io::duplex(1024);
    let hub_task = tokio::spawn(async move { upgrade(hub_side).await });

    let mut request = vec![0u8; REQUEST.len()];
    agent_side.read_exact(&mut request).await.unwrap();
    agent_side.write_all(b"HTTP/1.1 404 Not Found\r\n\r\n").await.unwrap();

    let result = hub_task.await.unwrap();
    assert!(result.is_err());
}

#[tokio::test]
async fn eof_before_headers_complete_is_an_error() {
    let (hub_side, mut agent_side) = tokio::io::duplex(1024);
    let hub_task = tokio::spawn(async move { upgrade(hub_side).await });

    let mut request = vec![0u8; REQUEST.len()];
    agent_side.read_exact(&mut request).await.unwrap();
    agent_side.write_all(b"HTTP/1.1 101 Switching").await.unwrap();
    drop(agent_side);

    let result = hub_task.await.unwrap();
    assert!(result.is_err());
}
