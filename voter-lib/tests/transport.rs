//! Socket-level tests for the receive loop

mod common;

use common::*;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::time::timeout;
use voter_lib::transport::{bind, process_datagram, serve};

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

async fn start_host() -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let socket = bind("127.0.0.1:0".parse().unwrap()).await.expect("bind host socket");
    let addr = socket.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let responder = stock_responder();
        serve(&socket, &responder, async {
            let _ = rx.await;
        })
        .await;
    });
    (addr, tx, handle)
}

#[tokio::test]
async fn test_auth_round_trip_over_udp() {
    let (host, shutdown, handle) = start_host().await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    let frame = make_frame(PayloadType::Auth, b"433463776", 0xFCCA_02CA, &[]);
    client.send_to(&frame.encode(), host).await.unwrap();

    let mut buf = [0u8; 64];
    let (n, from) = timeout(REPLY_TIMEOUT, client.recv_from(&mut buf))
        .await
        .expect("no reply within timeout")
        .unwrap();
    assert_eq!(from, host);

    let reply = Frame::try_from(&buf[..n]).unwrap();
    assert_eq!(&reply.challenge, b"1234567890");
    assert_eq!(reply.digest, digest(b"433463776", b"bloodhound"));
    assert_eq!(reply.vtime_sec, frame.vtime_sec);

    shutdown.send(()).unwrap();
    timeout(REPLY_TIMEOUT, handle).await.expect("loop did not stop").unwrap();
}

#[tokio::test]
async fn test_loop_survives_short_frame() {
    let (host, shutdown, handle) = start_host().await;
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

    client.send_to(&[0u8; 19], host).await.unwrap();
    let audio = make_frame(PayloadType::Audio, b"433463776", 0, &[0x2A]);
    client.send_to(&audio.encode(), host).await.unwrap();
    let auth = make_frame(PayloadType::Auth, b"433463776", 0, &[]);
    client.send_to(&auth.encode(), host).await.unwrap();

    // The only datagram that comes back is the AUTH reply
    let mut buf = [0u8; 64];
    let (n, _) = timeout(REPLY_TIMEOUT, client.recv_from(&mut buf))
        .await
        .expect("loop stopped answering after a short frame")
        .unwrap();
    let reply = Frame::try_from(&buf[..n]).unwrap();
    assert_eq!(reply.payload_type, PayloadType::Auth);
    assert_eq!(n, HEADER_SIZE);

    shutdown.send(()).unwrap();
    timeout(REPLY_TIMEOUT, handle).await.expect("loop did not stop").unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let taken = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();
    match bind(addr).await {
        Err(VoterError::Bind { addr: failed, .. }) => assert_eq!(failed, addr),
        Ok(_) => panic!("binding an occupied port should fail"),
        Err(other) => panic!("expected Bind error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reply_is_counted_only_once_sent() {
    let host = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer = client.local_addr().unwrap();
    let responder = stock_responder();

    let audio = make_frame(PayloadType::Audio, b"433463776", 0, &[0x2A]);
    let sent = process_datagram(&host, &responder, audio.encode(), peer).await.unwrap();
    assert_eq!(sent, None);

    let auth = make_frame(PayloadType::Auth, b"433463776", 0, &[]);
    let sent = process_datagram(&host, &responder, auth.encode(), peer).await.unwrap();
    assert_eq!(sent, Some(HEADER_SIZE));

    let mut buf = [0u8; 64];
    let (n, _) = timeout(REPLY_TIMEOUT, client.recv_from(&mut buf))
        .await
        .expect("reply was reported sent but never arrived")
        .unwrap();
    assert_eq!(n, HEADER_SIZE);
}
