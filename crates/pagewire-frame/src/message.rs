use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{
    check_field, check_message, parse_seq, put_left_justified, put_right_justified, put_seq,
    DEST_FIELD_WIDTH, PAGER_FIELD_WIDTH, SEQ_DIGITS, TERMINATOR,
};
use crate::error::{FrameError, Result};

/// The three message kinds the protocol defines.
///
/// The kind doubles as the frame's first byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// `v`: query a pager's service status.
    Verify,
    /// `d`: page a destination directly.
    PageDirect,
    /// `m`: queue a message for delivery.
    SendMessage,
}

impl MessageKind {
    /// The wire discriminator byte.
    pub fn discriminator(self) -> u8 {
        match self {
            MessageKind::Verify => b'v',
            MessageKind::PageDirect => b'd',
            MessageKind::SendMessage => b'm',
        }
    }

    /// Map a wire discriminator byte back to a kind.
    pub fn from_discriminator(byte: u8) -> Option<Self> {
        match byte {
            b'v' => Some(MessageKind::Verify),
            b'd' => Some(MessageKind::PageDirect),
            b'm' => Some(MessageKind::SendMessage),
            _ => None,
        }
    }

    /// Human-readable kind name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Verify => "verify",
            MessageKind::PageDirect => "page-direct",
            MessageKind::SendMessage => "send-message",
        }
    }
}

/// An outbound command, before a sequence number is assigned.
///
/// Requests are encoded exactly once; the sequence number is stamped at
/// encode time by the caller that allocated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Query the service status of `pager`.
    Verify { pager: String },
    /// Page `pager` directly through destination `dest`.
    PageDirect {
        dest: String,
        pager: String,
        message: String,
    },
    /// Queue `message` for delivery to `pager`.
    SendMessage { pager: String, message: String },
}

impl Request {
    /// The message kind this request encodes as.
    pub fn kind(&self) -> MessageKind {
        match self {
            Request::Verify { .. } => MessageKind::Verify,
            Request::PageDirect { .. } => MessageKind::PageDirect,
            Request::SendMessage { .. } => MessageKind::SendMessage,
        }
    }

    /// Encode this request with sequence number `seq`.
    ///
    /// Fails without side effects when a field cannot be carried by the
    /// fixed-width ASCII format.
    pub fn encode(&self, seq: u8) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(32);
        buf.put_u8(self.kind().discriminator());
        put_seq(&mut buf, seq)?;

        match self {
            Request::Verify { pager } => {
                check_field("pager", pager, PAGER_FIELD_WIDTH)?;
                put_right_justified(&mut buf, pager, PAGER_FIELD_WIDTH);
            }
            Request::PageDirect {
                dest,
                pager,
                message,
            } => {
                check_field("destination", dest, DEST_FIELD_WIDTH)?;
                check_field("pager", pager, PAGER_FIELD_WIDTH)?;
                check_message(message)?;
                put_right_justified(&mut buf, dest, DEST_FIELD_WIDTH);
                put_left_justified(&mut buf, pager, PAGER_FIELD_WIDTH);
                buf.put_slice(message.as_bytes());
            }
            Request::SendMessage { pager, message } => {
                check_field("pager", pager, PAGER_FIELD_WIDTH)?;
                check_message(message)?;
                put_left_justified(&mut buf, pager, PAGER_FIELD_WIDTH);
                buf.put_slice(message.as_bytes());
            }
        }

        buf.put_u8(TERMINATOR);
        Ok(buf.freeze())
    }
}

/// An inbound reply, decoded from one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Reply to a verify request.
    Verify { seq: u8, pager: String, status: u8 },
    /// Reply to a page-direct request.
    PageDirect { seq: u8, status: u8 },
    /// Reply to a send-message request.
    SendMessage { seq: u8, status: u8 },
}

impl Response {
    /// The message kind this response was decoded from.
    pub fn kind(&self) -> MessageKind {
        match self {
            Response::Verify { .. } => MessageKind::Verify,
            Response::PageDirect { .. } => MessageKind::PageDirect,
            Response::SendMessage { .. } => MessageKind::SendMessage,
        }
    }

    /// The sequence number correlating this reply to its request.
    pub fn seq(&self) -> u8 {
        match self {
            Response::Verify { seq, .. }
            | Response::PageDirect { seq, .. }
            | Response::SendMessage { seq, .. } => *seq,
        }
    }

    /// Decode one inbound frame.
    ///
    /// The first byte selects the decoder; an unrecognized discriminator is
    /// a fatal protocol error.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let Some(&discriminator) = frame.first() else {
            return Err(FrameError::Truncated {
                kind: "response",
                len: 0,
                need: 1,
            });
        };
        let kind = MessageKind::from_discriminator(discriminator)
            .ok_or(FrameError::UnknownKind(discriminator as char))?;

        match kind {
            MessageKind::Verify => Self::decode_verify(frame),
            MessageKind::PageDirect | MessageKind::SendMessage => {
                Self::decode_status_only(kind, frame)
            }
        }
    }

    /// `v` + sequence + pager field + status byte.
    ///
    /// Terminals differ in how they pad the pager field, so the status byte
    /// is taken from the end and the pager field is the space-trimmed middle.
    fn decode_verify(frame: &[u8]) -> Result<Self> {
        const NEED: usize = 1 + SEQ_DIGITS + 1 + 1;
        if frame.len() < NEED {
            return Err(FrameError::Truncated {
                kind: MessageKind::Verify.name(),
                len: frame.len(),
                need: NEED,
            });
        }

        let seq = parse_seq(&frame[1..1 + SEQ_DIGITS])?;
        let status = frame[frame.len() - 1];
        let field = frame[1 + SEQ_DIGITS..frame.len() - 1].trim_ascii();
        if field.is_empty() {
            return Err(FrameError::Truncated {
                kind: MessageKind::Verify.name(),
                len: frame.len(),
                need: NEED,
            });
        }
        let pager = std::str::from_utf8(field)
            .map_err(|_| FrameError::InvalidField("pager"))?
            .to_string();

        Ok(Response::Verify { seq, pager, status })
    }

    /// `d`/`m` + sequence + status byte.
    fn decode_status_only(kind: MessageKind, frame: &[u8]) -> Result<Self> {
        const NEED: usize = 1 + SEQ_DIGITS + 1;
        if frame.len() < NEED {
            return Err(FrameError::Truncated {
                kind: kind.name(),
                len: frame.len(),
                need: NEED,
            });
        }

        let seq = parse_seq(&frame[1..1 + SEQ_DIGITS])?;
        let status = frame[1 + SEQ_DIGITS];

        Ok(match kind {
            MessageKind::PageDirect => Response::PageDirect { seq, status },
            MessageKind::SendMessage => Response::SendMessage { seq, status },
            MessageKind::Verify => unreachable!("verify uses decode_verify"),
        })
    }
}
