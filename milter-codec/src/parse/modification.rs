//! Parsers for the modification family: filter → MTA post-`EndOfMessage` edits (§3, §4.2, §6).

use milter_types::message::modification::Modification;

use crate::{
    decode::finish_error,
    error::FramingError,
    parse::expect_empty,
    wire::{cstring, raw_tail, u32_be},
};

/// Dispatches on the modification tag byte (§6). The caller has already narrowed `tag` to one
/// of the ten modification tags.
pub(crate) fn parse(tag: u8, payload: &[u8]) -> Result<Modification, FramingError> {
    match tag {
        b'h' => add_header(payload),
        b'm' => change_header(payload),
        b'i' => insert_header(payload),
        b'e' => change_sender(payload),
        b'+' => add_recipient(payload),
        b'2' => add_recipient_par(payload),
        b'-' => remove_recipient(payload),
        b'b' => {
            let (rest, data) = raw_tail(payload).map_err(finish_error)?;
            expect_empty(rest)?;
            Ok(Modification::ReplaceBody { data })
        }
        b'p' => {
            expect_empty(payload)?;
            Ok(Modification::Progress)
        }
        b'q' => quarantine(payload),
        _ => unreachable!("parse::message only dispatches recognised modification tags"),
    }
}

/// `h` — `cstring name ‖ cstring value` (§4.2).
fn add_header(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, name) = cstring(payload).map_err(finish_error)?;
    let (rest, value) = cstring(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::AddHeader { name, value })
}

/// `m` — `u32 index ‖ cstring name ‖ cstring value` (§4.2). An empty `value` deletes the header.
fn change_header(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, index) = u32_be(payload).map_err(finish_error)?;
    let (rest, name) = cstring(rest).map_err(finish_error)?;
    let (rest, value) = cstring(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::ChangeHeader { index, name, value })
}

/// `i` — `u32 index ‖ cstring name ‖ cstring value` (§4.2).
fn insert_header(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, index) = u32_be(payload).map_err(finish_error)?;
    let (rest, name) = cstring(rest).map_err(finish_error)?;
    let (rest, value) = cstring(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::InsertHeader { index, name, value })
}

/// `e` — `cstring addr` optionally followed by `cstring args`; absence of `args` is
/// distinguished by payload exhaustion after the first terminator (§4.2).
fn change_sender(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, address) = cstring(payload).map_err(finish_error)?;
    let args = if rest.is_empty() {
        None
    } else {
        let (rest, args) = cstring(rest).map_err(finish_error)?;
        expect_empty(rest)?;
        Some(args)
    };
    Ok(Modification::ChangeSender { address, args })
}

/// `+` — a single `cstring` (§4.2).
fn add_recipient(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, address) = cstring(payload).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::AddRecipient { address })
}

/// `2` — `cstring addr ‖ cstring args` (§4.2).
fn add_recipient_par(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, address) = cstring(payload).map_err(finish_error)?;
    let (rest, args) = cstring(rest).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::AddRecipientPar { address, args })
}

/// `-` — a single `cstring` (§4.2).
fn remove_recipient(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, address) = cstring(payload).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::RemoveRecipient { address })
}

/// `q` — a single `cstring` (§4.2).
fn quarantine(payload: &[u8]) -> Result<Modification, FramingError> {
    let (rest, reason) = cstring(payload).map_err(finish_error)?;
    expect_empty(rest)?;
    Ok(Modification::Quarantine { reason })
}
