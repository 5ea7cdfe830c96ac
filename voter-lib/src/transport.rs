use crate::constants::MAX_DATAGRAM_SIZE;
use crate::error::VoterError;
use crate::responder::Responder;
use bytes::Bytes;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{error, info, warn};

/// Bind the host socket. Failure here is fatal for the host.
pub async fn bind(addr: SocketAddr) -> Result<UdpSocket, VoterError> {
    let socket = UdpSocket::bind(addr)
        .await
        .map_err(|source| VoterError::Bind { addr, source })?;
    info!("Voter analyzer listening on udp://{}", socket.local_addr()?);
    Ok(socket)
}

/// Receive loop. Datagrams are handled strictly one at a time; any error
/// while handling one is logged and the loop moves on to the next. Returns
/// once `shutdown` resolves.
pub async fn serve<F>(socket: &UdpSocket, responder: &Responder, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (n, peer) = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, leaving receive loop");
                return;
            }
            res = socket.recv_from(&mut buf) => match res {
                Ok(received) => received,
                Err(e) => {
                    warn!("[!] Receive error: {}", e);
                    continue;
                }
            },
        };

        match process_datagram(socket, responder, Bytes::copy_from_slice(&buf[..n]), peer).await {
            Ok(Some(sent)) => info!("    >>> Sent AUTH Reply to {} ({} bytes)", peer, sent),
            Ok(None) => {}
            Err(VoterError::ShortFrame { actual, .. }) => {
                warn!("[!] Short Packet from {} ({} bytes)", peer, actual);
            }
            Err(e) => error!("[!] Error handling datagram from {}: {}", peer, e),
        }
    }
}

/// Handle one datagram and send the reply, if the responder produced one.
/// Returns the number of bytes sent.
pub async fn process_datagram(
    socket: &UdpSocket,
    responder: &Responder,
    datagram: Bytes,
    peer: SocketAddr,
) -> Result<Option<usize>, VoterError> {
    let handled = responder.handle(datagram, peer)?;
    match handled.reply {
        Some(reply) => Ok(Some(socket.send_to(&reply, peer).await?)),
        None => Ok(None),
    }
}
