//! Parsers for the event family: MTA → filter messages (§3, §4.2, §6).

use milter_types::{
    address::{ConnectAddress, Family},
    message::event::Event,
};

use crate::{
    decode::finish_error,
    error::FramingError,
    parse::expect_empty,
    wire::{byte, cstring, raw_tail, u16_be},
};

/// Dispatches on the event tag byte (§6). The caller (`parse::message`) has already narrowed
/// `tag` to one of the twelve event tags.
pub(crate) fn parse(tag: u8, payload: &[u8]) -> Result<Event, FramingError> {
    match tag {
        b'C' => connect(payload),
        b'H' => helo(payload),
        b'K' => envelope_from(payload),
        b'R' => envelope_recipient(payload),
        b'T' => {
            expect_empty(payload)?;
            Ok(Event::Data)
        }
        b'U' => unknown(payload),
        b'L' => header(payload),
        b'N' => {
            expect_empty(payload)?;
            Ok(Event::EndOfHeaders)
        }
        b'B' => {
            let (rest, chunk) = raw_tail(payload).map_err(finish_error)?;
            expect_empty(rest)?;
            Ok(Event::Body { chunk })
        }
        b'E' => {
            let (rest, chunk) = raw_tail(payload).map_err(finish_error)?;
            expect_empty(rest)?;
            Ok(Event::EndOfMessage { chunk })
        }
        b'A' => {
            expect_empty(payload)?;
            Ok(Event::Abort)
        }
        b'Q' => {
            expect_empty(payload)?;
            Ok(Event::Close)
        }
        _ => unreachable!("parse::message only dispatches recognised event tags"),
    }
}

/// `C` — `cstring host ‖ u8 family ‖ [u16 port ‖ cstring addr]` (§4.2).
///
/// The port/address fields are present for every family except [`Family::Unknown`], which ends
/// the payload right after the family byte.
fn connect(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, host) = cstring(payload).map_err(finish_error)?;
    let (rest, family_tag) = byte(rest).map_err(finish_error)?;
    let family = Family::from_tag(family_tag).ok_or(FramingError::UnknownFamily { tag: family_tag })?;

    let address = if family == Family::Unknown {
        expect_empty(rest)?;
        ConnectAddress::Unknown
    } else {
        let (rest, port) = u16_be(rest).map_err(finish_error)?;
        let (rest, address) = cstring(rest).map_err(finish_error)?;
        expect_empty(rest)?;
        ConnectAddress::known(family, port, address)
    };

    Ok(Event::Connect { host, address })
}

/// `H` — a single `cstring` (§4.2).
fn helo(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, hostname) = cstring(payload).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Event::Helo { hostname })
}

/// `K` — `cstring sender ‖ cstrings args` (§4.2). Always `EnvelopeFrom`; see §9 on the tag's
/// documented overload with "QUIT with new connection".
fn envelope_from(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, sender) = cstring(payload).map_err(finish_error)?;
    let (rest, args) = crate::wire::string_table(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Event::EnvelopeFrom { sender, args })
}

/// `R` — `cstring recipient ‖ cstrings args` (§4.2).
fn envelope_recipient(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, recipient) = cstring(payload).map_err(finish_error)?;
    let (rest, args) = crate::wire::string_table(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Event::EnvelopeRecipient { recipient, args })
}

/// `U` — a single `cstring` (§4.2).
fn unknown(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, command) = cstring(payload).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Event::Unknown { command })
}

/// `L` — `cstring name ‖ cstring value` (§4.2).
fn header(payload: &[u8]) -> Result<Event, FramingError> {
    let (rest, name) = cstring(payload).map_err(finish_error)?;
    let (rest, value) = cstring(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Event::Header { name, value })
}
