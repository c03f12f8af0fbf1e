/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The inbound frame begins with an unrecognized discriminator byte.
    #[error("unknown message type {0:?}")]
    UnknownKind(char),

    /// The inbound frame is shorter than its message type allows.
    #[error("{kind} response truncated ({len} bytes, need {need})")]
    Truncated {
        kind: &'static str,
        len: usize,
        need: usize,
    },

    /// The sequence field is not two ASCII digits.
    #[error("malformed sequence field")]
    InvalidSequence,

    /// The sequence number does not fit the wire format's 2-digit field.
    #[error("sequence number {0} outside wire range")]
    SequenceOutOfRange(u8),

    /// A request field is empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A request field exceeds its fixed wire width.
    #[error("{field} too long ({len} bytes, max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A field contains bytes the ASCII wire format cannot carry.
    #[error("{0} contains bytes outside printable ASCII")]
    InvalidField(&'static str),
}

pub type Result<T> = std::result::Result<T, FrameError>;
