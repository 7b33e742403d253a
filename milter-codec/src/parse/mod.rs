//! Per-message-family `nom` parsers (§4.2) and the tag-keyed dispatch table that turns a
//! `(tag, payload)` frame into a [`Message`].

mod event;
mod modification;
mod response;
mod setup;

use milter_types::message::{Message, Misc};

use crate::error::FramingError;

/// Fails if `rest` is non-empty: used after a message's fixed fields are parsed, since surplus
/// bytes in payloads without a raw tail are a framing error (§4.2: "surplus bytes are a
/// FramingError").
fn expect_empty(rest: &[u8]) -> Result<(), FramingError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(FramingError::TrailingBytes { extra: rest.len() })
    }
}

/// Parses one frame's payload into a [`Message`], dispatching on `tag` (§4.2, §6).
///
/// An unrecognised tag is not a [`FramingError`]: it decodes to [`Message::Misc`], carrying the
/// raw payload, so a caller can log and continue (§4.2 "Unknown-tag tolerance", §7
/// `UnknownMessage`).
pub(crate) fn message(tag: u8, payload: &[u8]) -> Result<Message, FramingError> {
    use milter_types::message::response::Response;

    match tag {
        b'O' => setup::negotiate(payload).map(Message::Negotiate),
        b'D' => setup::macro_message(payload).map(Message::Macro),
        b'C' | b'H' | b'K' | b'R' | b'T' | b'U' | b'L' | b'N' | b'B' | b'E' | b'A' | b'Q' => {
            event::parse(tag, payload).map(Message::Event)
        }
        b'c' => empty_response(payload, Response::Continue),
        b'r' => empty_response(payload, Response::Reject),
        b'd' => empty_response(payload, Response::Discard),
        b'a' => empty_response(payload, Response::Accept),
        b't' => empty_response(payload, Response::TemporaryFailure),
        b's' => empty_response(payload, Response::Skip),
        b'y' => response::reply_code(payload).map(Message::Response),
        b'h' | b'm' | b'i' | b'e' | b'+' | b'2' | b'-' | b'b' | b'p' | b'q' => {
            modification::parse(tag, payload).map(Message::Modification)
        }
        _ => Ok(Message::Misc(Misc::new(tag, payload.to_vec()))),
    }
}

fn empty_response(
    payload: &[u8],
    response: milter_types::message::response::Response,
) -> Result<Message, FramingError> {
    expect_empty(payload)?;
    Ok(Message::Response(response))
}
