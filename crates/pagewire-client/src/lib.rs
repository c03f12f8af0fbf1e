//! Sequence-correlated request/response client for the paging protocol.
//!
//! This is the "just works" layer. A [`Client`] owns one UDP transport, a
//! bounded pool of sequence numbers, and a correlation table that routes
//! each inbound reply back to the caller whose request carried the same
//! sequence number. The transport gives no ordering, delivery, or
//! multiplexing guarantees; the client supplies the multiplexing.
//!
//! Constructing a client does not make it usable: [`Client::run`] must be
//! executing, typically on its own thread, for requests to complete.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::thread;
//!
//! use pagewire_client::Client;
//!
//! # fn main() -> Result<(), pagewire_client::ClientError> {
//! let client = Arc::new(Client::connect("terminal.example.com:444")?);
//!
//! let dispatch = {
//!     let client = Arc::clone(&client);
//!     thread::spawn(move || client.run())
//! };
//!
//! let queued = client.send_message("0000000001", "call the office")?;
//! println!("queued: {queued}");
//!
//! client.close()?;
//! dispatch.join().expect("dispatch thread panicked")?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
mod waiters;

pub use client::Client;
pub use error::{ClientError, Result};
