//! Single-peer UDP datagram transport.
//!
//! Paging terminals speak a datagram protocol to exactly one remote peer.
//! This is the lowest layer of pagewire: resolve the peer once, bind an
//! ephemeral local socket, and exchange raw datagrams. Everything else
//! builds on top of the [`UdpTransport`] type provided here.

pub mod error;
pub mod udp;

pub use error::{Result, TransportError};
pub use udp::UdpTransport;
