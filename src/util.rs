//! Internal utilities.

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Encode bytes as lowercase hex (for opaque value display).
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Create an ephemeral UDP socket suitable for talking to `target`.
///
/// Binds to the unspecified address of the target's address family. For
/// IPv6 targets the socket is restricted to IPv6 only; the Manager picks
/// the family from the resolved target, so dual-stack is unnecessary.
pub(crate) fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, bind_addr): (Domain, SocketAddr) = if target.is_ipv6() {
        (Domain::IPV6, "[::]:0".parse().unwrap())
    } else {
        (Domain::IPV4, "0.0.0.0:0".parse().unwrap())
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if target.is_ipv6() {
        socket.set_only_v6(true)?;
    }

    // Non-blocking before handing the fd to tokio
    socket.set_nonblocking(true)?;
    socket.bind(&bind_addr.into())?;

    UdpSocket::from_std(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(hex_encode(&[0x00, 0xff]), "00ff");
        assert_eq!(hex_encode(&[]), "");
    }

    #[tokio::test]
    async fn test_bind_ephemeral_ipv4() {
        let target: SocketAddr = "127.0.0.1:161".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv4());
        assert_ne!(local.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_ipv6() {
        let target: SocketAddr = "[::1]:161".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv6());
    }
}
