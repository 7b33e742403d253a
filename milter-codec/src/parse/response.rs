//! Parser for the one response with a payload: `ReplyCode` (§4.2).
//!
//! The other six response tags (`Continue`, `Reject`, `Discard`, `Accept`, `TemporaryFailure`,
//! `Skip`) are dispatched directly from `parse::message` since they carry no payload at all.

use milter_types::message::response::{ReplyCode, Response};

use crate::{decode::finish_error, error::FramingError, parse::expect_empty, wire::cstring};

/// `y` — `code(3 ASCII digits) ‖ ' ' ‖ text(cstring)` (§4.2).
///
/// The leading 3 bytes must be ASCII digits forming a value in `400..=599`; anything else is a
/// [`FramingError::BadReplyCode`].
pub(crate) fn reply_code(payload: &[u8]) -> Result<Response, FramingError> {
    if payload.len() < 4 {
        return Err(FramingError::BadReplyCode);
    }

    let digits = &payload[0..3];
    if !digits.iter().all(u8::is_ascii_digit) || payload[3] != b' ' {
        return Err(FramingError::BadReplyCode);
    }

    let code: u16 = std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(FramingError::BadReplyCode)?;

    let (rest, text) = cstring(&payload[4..]).map_err(finish_error)?;
    expect_empty(rest)?;

    let reply = ReplyCode::new(code, text).map_err(|_| FramingError::BadReplyCode)?;
    Ok(Response::ReplyCode(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_reply_code() {
        let response = reply_code(b"451 slow\0").unwrap();
        match response {
            Response::ReplyCode(reply) => {
                assert_eq!(reply.code(), 451);
                assert_eq!(reply.text(), "slow");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn rejects_non_digit_code() {
        assert!(matches!(
            reply_code(b"abc Hello\0"),
            Err(FramingError::BadReplyCode)
        ));
    }

    #[test]
    fn rejects_out_of_range_code() {
        assert!(matches!(
            reply_code(b"200 ok\0"),
            Err(FramingError::BadReplyCode)
        ));
    }
}
