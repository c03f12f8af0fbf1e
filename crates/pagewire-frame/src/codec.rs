use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Decimal digits in the wire sequence field.
pub const SEQ_DIGITS: usize = 2;

/// Size of the sequence space implied by the wire format.
///
/// Widening the sequence field means raising this together with
/// [`SEQ_DIGITS`]; everything above indexes off these constants.
pub const SEQ_SPACE: u8 = 100;

/// Width of the pager number field.
pub const PAGER_FIELD_WIDTH: usize = 10;

/// Width of the destination code field in page-direct requests.
pub const DEST_FIELD_WIDTH: usize = 2;

/// Request frame terminator.
pub const TERMINATOR: u8 = b'\r';

/// Append the 2-digit decimal sequence field.
pub(crate) fn put_seq(buf: &mut BytesMut, seq: u8) -> Result<()> {
    if seq >= SEQ_SPACE {
        return Err(FrameError::SequenceOutOfRange(seq));
    }
    buf.put_u8(b'0' + seq / 10);
    buf.put_u8(b'0' + seq % 10);
    Ok(())
}

/// Parse the 2-digit decimal sequence field.
pub(crate) fn parse_seq(digits: &[u8]) -> Result<u8> {
    if digits.len() != SEQ_DIGITS || !digits.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::InvalidSequence);
    }
    Ok((digits[0] - b'0') * 10 + (digits[1] - b'0'))
}

/// Append `field` right-justified, space-padded to `width`.
pub(crate) fn put_right_justified(buf: &mut BytesMut, field: &str, width: usize) {
    for _ in field.len()..width {
        buf.put_u8(b' ');
    }
    buf.put_slice(field.as_bytes());
}

/// Append `field` left-justified, space-padded to `width`.
pub(crate) fn put_left_justified(buf: &mut BytesMut, field: &str, width: usize) {
    buf.put_slice(field.as_bytes());
    for _ in field.len()..width {
        buf.put_u8(b' ');
    }
}

/// Validate a fixed-width identifier field (pager number, destination code).
pub(crate) fn check_field(name: &'static str, value: &str, width: usize) -> Result<()> {
    if value.is_empty() {
        return Err(FrameError::EmptyField(name));
    }
    if value.len() > width {
        return Err(FrameError::FieldTooLong {
            field: name,
            len: value.len(),
            max: width,
        });
    }
    if !value.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(FrameError::InvalidField(name));
    }
    Ok(())
}

/// Validate a free-text message field.
///
/// The terminator byte is how the remote finds the end of the message, so it
/// cannot appear inside one.
pub(crate) fn check_message(value: &str) -> Result<()> {
    if !value.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
        return Err(FrameError::InvalidField("message"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_field_is_zero_padded() {
        let mut buf = BytesMut::new();
        put_seq(&mut buf, 7).unwrap();
        assert_eq!(buf.as_ref(), b"07");

        let mut buf = BytesMut::new();
        put_seq(&mut buf, 42).unwrap();
        assert_eq!(buf.as_ref(), b"42");
    }

    #[test]
    fn seq_out_of_wire_range_rejected() {
        let mut buf = BytesMut::new();
        let err = put_seq(&mut buf, SEQ_SPACE).unwrap_err();
        assert!(matches!(err, FrameError::SequenceOutOfRange(_)));
    }

    #[test]
    fn seq_roundtrip() {
        for seq in 0..SEQ_SPACE {
            let mut buf = BytesMut::new();
            put_seq(&mut buf, seq).unwrap();
            assert_eq!(parse_seq(buf.as_ref()).unwrap(), seq);
        }
    }

    #[test]
    fn parse_seq_rejects_non_digits() {
        assert!(matches!(
            parse_seq(b"a1"),
            Err(FrameError::InvalidSequence)
        ));
        assert!(matches!(parse_seq(b"1"), Err(FrameError::InvalidSequence)));
    }

    #[test]
    fn justification_padding() {
        let mut buf = BytesMut::new();
        put_right_justified(&mut buf, "42", 10);
        assert_eq!(buf.as_ref(), b"        42");

        let mut buf = BytesMut::new();
        put_left_justified(&mut buf, "42", 10);
        assert_eq!(buf.as_ref(), b"42        ");
    }

    #[test]
    fn field_validation() {
        assert!(check_field("pager", "0000000001", PAGER_FIELD_WIDTH).is_ok());
        assert!(matches!(
            check_field("pager", "", PAGER_FIELD_WIDTH),
            Err(FrameError::EmptyField("pager"))
        ));
        assert!(matches!(
            check_field("pager", "00000000001", PAGER_FIELD_WIDTH),
            Err(FrameError::FieldTooLong { .. })
        ));
        assert!(matches!(
            check_field("pager", "12 34", PAGER_FIELD_WIDTH),
            Err(FrameError::InvalidField("pager"))
        ));
    }

    #[test]
    fn message_validation() {
        assert!(check_message("back in 5 minutes").is_ok());
        assert!(matches!(
            check_message("line one\rline two"),
            Err(FrameError::InvalidField("message"))
        ));
        assert!(matches!(
            check_message("caf\u{e9}"),
            Err(FrameError::InvalidField("message"))
        ));
    }
}
