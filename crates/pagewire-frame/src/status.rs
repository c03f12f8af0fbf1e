//! Protocol status bytes.
//!
//! Page-direct and send-message responses answer with a single control byte;
//! verify responses answer with a service-state letter.

/// Remote accepted the message for queueing (ASCII ACK).
pub const ACK: u8 = 0x06;

/// Remote refused the message (ASCII NAK).
pub const NAK: u8 = 0x15;

/// Verify status: no such pager.
pub const STATUS_NOT_FOUND: u8 = b'N';

/// Verify status: pager is in service.
pub const STATUS_IN_SERVICE: u8 = b'I';

/// Verify status: pager is out of service.
pub const STATUS_OUT_OF_SERVICE: u8 = b'O';

/// Returns a human-readable name for a status byte.
pub fn status_name(status: u8) -> &'static str {
    match status {
        ACK => "acknowledged",
        NAK => "refused",
        STATUS_NOT_FOUND => "no such pager",
        STATUS_IN_SERVICE => "in service",
        STATUS_OUT_OF_SERVICE => "out of service",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_for_known_statuses() {
        assert_eq!(status_name(ACK), "acknowledged");
        assert_eq!(status_name(NAK), "refused");
        assert_eq!(status_name(STATUS_IN_SERVICE), "in service");
        assert_eq!(status_name(b'?'), "unknown");
    }
}
