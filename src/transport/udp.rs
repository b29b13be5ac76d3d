//! UDP transport.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::util::bind_ephemeral_udp_socket;

/// Maximum response datagram we will accept.
///
/// Large enough for any response an agent will send over UDP without
/// fragmentation concerns on our side (we only receive, never fragment).
const RECV_BUFFER_SIZE: usize = 65_535;

/// UDP transport for SNMP exchanges.
///
/// Each exchange binds a fresh ephemeral socket, connects it to the
/// target, sends one datagram, and waits for one back. Connecting the
/// socket makes the kernel filter datagrams from other sources, so a
/// reply is always from the agent we asked.
#[derive(Debug, Clone, Default)]
pub struct UdpTransport {
    _private: (),
}

impl UdpTransport {
    /// Create a new UDP transport.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for UdpTransport {
    async fn exchange(
        &self,
        target: SocketAddr,
        payload: &[u8],
        timeout: Duration,
    ) -> Result<Bytes> {
        let socket = bind_ephemeral_udp_socket(target).map_err(|source| Error::Socket {
            target: Some(target),
            source,
        })?;

        socket
            .connect(target)
            .await
            .map_err(|source| Error::Socket {
                target: Some(target),
                source,
            })?;

        trace!(
            target: "snmp_manager::transport",
            %target,
            len = payload.len(),
            "sending request"
        );

        socket.send(payload).await.map_err(|source| Error::Socket {
            target: Some(target),
            source,
        })?;

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let received = tokio::time::timeout(timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| {
                debug!(target: "snmp_manager::transport", %target, ?timeout, "receive timed out");
                Error::Timeout {
                    target,
                    elapsed: timeout,
                    retries: 0,
                }
            })?
            .map_err(|source| Error::Socket {
                target: Some(target),
                source,
            })?;

        buf.truncate(received);

        trace!(
            target: "snmp_manager::transport",
            %target,
            len = received,
            "received response"
        );

        Ok(Bytes::from(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_when_nobody_answers() {
        let transport = UdpTransport::new();
        // Bind a socket that never replies and aim at it.
        let silent = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = silent.local_addr().unwrap();

        let err = transport
            .exchange(target, &[0x30, 0x00], Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { retries: 0, .. }));
    }

    #[tokio::test]
    async fn test_exchange_roundtrip() {
        let transport = UdpTransport::new();
        let echo = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = echo.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 1500];
            let (n, peer) = echo.recv_from(&mut buf).await.unwrap();
            echo.send_to(&buf[..n], peer).await.unwrap();
        });

        let response = transport
            .exchange(target, &[0x30, 0x03, 0x02, 0x01, 0x2A], Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(&response[..], &[0x30, 0x03, 0x02, 0x01, 0x2A]);
        server.await.unwrap();
    }
}
