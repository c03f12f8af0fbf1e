//! ASCII wire codec for the paging protocol.
//!
//! Every frame is a short ASCII command:
//! - A 1-byte message-kind discriminator (`v`, `d`, or `m`)
//! - A 2-digit decimal sequence number correlating request and reply
//! - Fixed-width payload fields, space-padded
//! - Requests end with a carriage return; responses end with a status byte
//!
//! This crate is pure formatting. Correlation and transport live above it.

pub mod codec;
pub mod error;
pub mod message;
pub mod status;

pub use codec::{DEST_FIELD_WIDTH, PAGER_FIELD_WIDTH, SEQ_DIGITS, SEQ_SPACE, TERMINATOR};
pub use error::{FrameError, Result};
pub use message::{MessageKind, Request, Response};
pub use status::{
    status_name, ACK, NAK, STATUS_IN_SERVICE, STATUS_NOT_FOUND, STATUS_OUT_OF_SERVICE,
};
