//! Parsers for the setup family: `Negotiate` (§4.1, §4.6) and `Macro` (§4.2).

use milter_types::{
    flags::{ActionFlags, ProtocolFlags},
    macros::MacroStage,
    message::setup::{Macro, MacroRequest, Negotiate},
};

use crate::{
    decode::finish_error,
    error::FramingError,
    parse::expect_empty,
    wire::{byte, cstring, string_table, u32_be},
};

/// One `u32 stage ‖ cstring(space-separated symbols)` record of a `Negotiate` macro table
/// (§4.2). Distinct from the standalone `Macro` message's 1-byte stage tag (§6), which
/// `macro_message` below still reads as a single byte.
fn macro_request(input: &[u8]) -> crate::decode::MilterResult<&[u8], MacroRequest> {
    let (input, stage) = u32_be(input)?;
    let (input, symbols) = cstring(input)?;
    let symbols = symbols
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect::<Vec<_>>();
    Ok((input, MacroRequest::new(MacroStage::from_wire_u32(stage), symbols)))
}

/// `O` — `u32 version ‖ u32 actions ‖ u32 protocol ‖ macro_table` (§4.1, §4.2).
///
/// Unknown bits of `actions`/`protocol` are preserved verbatim, since [`ActionFlags`]/
/// [`ProtocolFlags`] are thin wrappers over the raw `u32` (§4.2 "Unknown flag bits MUST be
/// preserved").
pub(crate) fn negotiate(payload: &[u8]) -> Result<Negotiate, FramingError> {
    let (rest, version) = u32_be(payload).map_err(finish_error)?;
    let (rest, actions) = u32_be(rest).map_err(finish_error)?;
    let (rest, protocol) = u32_be(rest).map_err(finish_error)?;
    let (rest, macros) = nom::multi::many0(macro_request)(rest).map_err(finish_error)?;
    expect_empty(rest)?;

    Ok(Negotiate::new(
        version,
        ActionFlags::from_bits(actions),
        ProtocolFlags::from_bits(protocol),
        macros,
    ))
}

/// `D` — `u8 event ‖ string_table` where the table is an even-length sequence of `(name, value)`
/// pairs (§4.2). An odd count is a [`FramingError::OddMacroTable`].
pub(crate) fn macro_message(payload: &[u8]) -> Result<Macro, FramingError> {
    let (rest, stage_byte) = byte(payload).map_err(finish_error)?;
    let (rest, strings) = string_table(rest).map_err(finish_error)?;
    expect_empty(rest)?;

    if strings.len() % 2 != 0 {
        return Err(FramingError::OddMacroTable {
            count: strings.len(),
        });
    }

    let values = strings
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();

    Macro::new(MacroStage::from_byte(stage_byte), values).map_err(|_| FramingError::Malformed)
}
