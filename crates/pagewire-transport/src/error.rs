use std::net::SocketAddr;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to resolve the remote address.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Resolution succeeded but produced no usable address.
    #[error("no usable address for {0}")]
    NoAddress(String),

    /// Failed to bind the local socket.
    #[error("failed to bind local socket: {0}")]
    Bind(std::io::Error),

    /// Failed to connect the socket to the remote peer.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// A datagram was only partially handed to the kernel.
    #[error("short send ({sent} of {len} bytes)")]
    ShortSend { sent: usize, len: usize },

    /// An I/O error occurred on the socket.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform cannot shut down a datagram socket.
    #[error("socket shutdown is not supported on this platform")]
    ShutdownUnsupported,
}

pub type Result<T> = std::result::Result<T, TransportError>;
