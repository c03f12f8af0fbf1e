use pagewire_frame::MessageKind;

/// Errors surfaced by client operations and the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] pagewire_transport::TransportError),

    /// Frame-level error (malformed outbound request or inbound reply).
    #[error("frame error: {0}")]
    Frame(#[from] pagewire_frame::FrameError),

    /// The client shut down before a reply arrived.
    #[error("got no response")]
    NoResponse,

    /// The reply's kind does not match the operation that requested it.
    #[error("invalid response type; expected {expected} but got {got}")]
    UnexpectedResponse {
        expected: &'static str,
        got: &'static str,
    },
}

impl ClientError {
    pub(crate) fn unexpected(expected: MessageKind, got: MessageKind) -> Self {
        ClientError::UnexpectedResponse {
            expected: expected.name(),
            got: got.name(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
