use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

use crate::error::{Result, TransportError};

/// UDP transport connected to a single remote peer.
///
/// The remote address is resolved once at construction; all traffic flows to
/// and from that peer. The send side and the receive side may be used
/// concurrently from different threads via [`UdpTransport::try_clone`].
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Receive buffer size. Larger than any legal frame on this protocol.
    pub const RECV_BUFFER_SIZE: usize = 1024;

    /// Resolve `addr`, bind an ephemeral local socket, and connect it to the
    /// peer.
    ///
    /// When a hostname resolves to several addresses, IPv4 is preferred;
    /// deployed paging terminals are IPv4-only.
    pub fn connect(addr: &str) -> Result<Self> {
        let peer = resolve(addr)?;

        let local: SocketAddr = if peer.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).map_err(TransportError::Bind)?;
        socket
            .connect(peer)
            .map_err(|source| TransportError::Connect { addr: peer, source })?;

        debug!(%peer, "connected udp transport");

        Ok(Self { socket, peer })
    }

    /// The remote peer's resolved address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// The local socket address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Into::into)
    }

    /// Send one datagram to the connected peer.
    pub fn send(&self, frame: &[u8]) -> Result<()> {
        let sent = self.socket.send(frame)?;
        if sent != frame.len() {
            return Err(TransportError::ShortSend {
                sent,
                len: frame.len(),
            });
        }
        Ok(())
    }

    /// Receive one datagram and its sender's address (blocking).
    ///
    /// Returns `Ok(None)` at end of stream, i.e. once the socket has been
    /// shut down. The protocol has no empty frames, so a zero-length read is
    /// unambiguous.
    #[cfg(unix)]
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        use std::os::fd::AsRawFd;

        loop {
            let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
            let mut addrlen = std::mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;

            // SAFETY: `buf` and `storage` are valid writable pointers for the
            // lengths provided, and the fd is an open socket descriptor owned
            // by `self.socket`. Going through libc directly because a
            // shutdown-released read returns zero bytes with no sender
            // address, which std's recv_from rejects.
            let received = unsafe {
                libc::recvfrom(
                    self.socket.as_raw_fd(),
                    buf.as_mut_ptr().cast::<libc::c_void>(),
                    buf.len(),
                    0,
                    (&mut storage as *mut libc::sockaddr_storage).cast::<libc::sockaddr>(),
                    &mut addrlen,
                )
            };

            if received < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(TransportError::Io(err));
            }
            if received == 0 {
                return Ok(None);
            }

            // A non-empty datagram always carries its sender; fall back to
            // the configured peer if the platform did not fill it in.
            let from = sockaddr_to_addr(&storage).unwrap_or(self.peer);
            return Ok(Some((received as usize, from)));
        }
    }

    /// Receive one datagram and its sender's address (blocking).
    #[cfg(not(unix))]
    pub fn recv_from(&self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>> {
        let (len, from) = self.socket.recv_from(buf)?;
        if len == 0 {
            return Ok(None);
        }
        Ok(Some((len, from)))
    }

    /// Create a second handle to the same socket.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            socket: self.socket.try_clone()?,
            peer: self.peer,
        })
    }

    /// Shut down both directions of the socket.
    ///
    /// A receiver blocked in [`UdpTransport::recv_from`] is released with an
    /// end-of-stream read.
    #[cfg(unix)]
    pub fn shutdown(&self) -> Result<()> {
        use std::os::fd::AsRawFd;

        // SAFETY: the fd is an open socket descriptor owned by `self.socket`.
        let rc = unsafe { libc::shutdown(self.socket.as_raw_fd(), libc::SHUT_RDWR) };
        if rc == 0 {
            return Ok(());
        }

        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ENOTCONN) {
            // Already shut down.
            return Ok(());
        }
        Err(TransportError::Io(err))
    }

    /// Shut down both directions of the socket.
    #[cfg(not(unix))]
    pub fn shutdown(&self) -> Result<()> {
        Err(TransportError::ShutdownUnsupported)
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("peer", &self.peer)
            .finish()
    }
}

#[cfg(unix)]
fn sockaddr_to_addr(storage: &libc::sockaddr_storage) -> Option<SocketAddr> {
    match libc::c_int::from(storage.ss_family) {
        libc::AF_INET => {
            // SAFETY: the kernel stored a sockaddr_in for AF_INET.
            let v4 = unsafe { &*(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_in>() };
            let ip = std::net::Ipv4Addr::from(u32::from_be(v4.sin_addr.s_addr));
            Some(SocketAddr::from((ip, u16::from_be(v4.sin_port))))
        }
        libc::AF_INET6 => {
            // SAFETY: the kernel stored a sockaddr_in6 for AF_INET6.
            let v6 = unsafe {
                &*(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_in6>()
            };
            let ip = std::net::Ipv6Addr::from(v6.sin6_addr.s6_addr);
            Some(SocketAddr::from((ip, u16::from_be(v6.sin6_port))))
        }
        _ => None,
    }
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            addr: addr.to_string(),
            source,
        })?
        .collect();

    addrs
        .iter()
        .find(|candidate| candidate.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| TransportError::NoAddress(addr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_send_recv_roundtrip() {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let transport = UdpTransport::connect(&peer_addr.to_string()).unwrap();
        assert_eq!(transport.peer_addr(), peer_addr);

        transport.send(b"v00      1234\r").unwrap();

        let mut buf = [0u8; 64];
        let (len, from) = peer.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"v00      1234\r");

        peer.send_to(b"v001234I", from).unwrap();

        let mut buf = [0u8; UdpTransport::RECV_BUFFER_SIZE];
        let (len, from) = transport.recv_from(&mut buf).unwrap().unwrap();
        assert_eq!(&buf[..len], b"v001234I");
        assert_eq!(from, peer_addr);
    }

    #[test]
    fn resolve_prefers_ipv4_literal() {
        let resolved = resolve("127.0.0.1:444").unwrap();
        assert!(resolved.is_ipv4());
        assert_eq!(resolved.port(), 444);
    }

    #[test]
    fn connect_rejects_unresolvable_address() {
        let result = UdpTransport::connect("pager.invalid.:444");
        assert!(matches!(
            result,
            Err(TransportError::Resolve { .. }) | Err(TransportError::NoAddress(_))
        ));
    }

    #[test]
    fn connect_rejects_malformed_address() {
        let result = UdpTransport::connect("not an address");
        assert!(matches!(result, Err(TransportError::Resolve { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn shutdown_releases_blocked_receiver() {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        let transport = UdpTransport::connect(&peer.local_addr().unwrap().to_string()).unwrap();

        let receiver = transport.try_clone().unwrap();
        let handle = std::thread::spawn(move || {
            let mut buf = [0u8; UdpTransport::RECV_BUFFER_SIZE];
            receiver.recv_from(&mut buf)
        });

        // Give the receiver time to block.
        std::thread::sleep(std::time::Duration::from_millis(50));
        transport.shutdown().unwrap();

        let result = handle.join().unwrap();
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    #[cfg(unix)]
    fn shutdown_twice_is_ok() {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        let transport = UdpTransport::connect(&peer.local_addr().unwrap().to_string()).unwrap();

        transport.shutdown().unwrap();
        transport.shutdown().unwrap();
    }
}
