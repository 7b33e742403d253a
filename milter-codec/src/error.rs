//! Error types returned by the codec and session layers (§7).
//!
//! Three families, matching §7's taxonomy:
//!
//! - [`FramingError`] — a malformed frame. Terminal for the byte stream; the session must be
//!   torn down.
//! - [`DecodeError`] — wraps [`FramingError`] at the [`crate::decoder::Decoder`] boundary.
//!   `NeedMore` is *not* a variant here: it is represented as `Ok(None)` from
//!   [`crate::decoder::Decoder::read_one`], since it is a non-error control signal, not a
//!   failure (§4.3).
//! - [`SessionError`] — a well-formed message that is illegal in the current phase, direction,
//!   or under negotiated flags (§4.5), or a negotiation failure (§4.6).

use milter_types::session::{Direction, Phase};
use thiserror::Error;

/// A malformed frame or payload (§7).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// The `u32` length prefix was `0`; every frame must at least carry a tag byte.
    #[error("frame size prefix was 0")]
    EmptyFrame,
    /// The declared frame size exceeded the configured maximum (§4.1).
    #[error("frame size {size} exceeds configured maximum {max}")]
    FrameTooLarge { size: u32, max: u32 },
    /// A string field ran to the end of the payload without a null terminator.
    #[error("string field had no null terminator")]
    MissingTerminator,
    /// A payload had bytes left over after its fixed set of fields was parsed.
    #[error("{extra} unexpected trailing byte(s) after the last field")]
    TrailingBytes { extra: usize },
    /// A string field was not valid UTF-8.
    #[error("string field was not valid UTF-8")]
    InvalidUtf8,
    /// `Macro`'s string table had an odd number of entries; it must be `name, value` pairs.
    #[error("macro value table had an odd number of strings ({count})")]
    OddMacroTable { count: usize },
    /// `ReplyCode`'s leading 3 bytes were not ASCII digits forming `400..=599`.
    #[error("reply code must be 3 ASCII digits in 400-599")]
    BadReplyCode,
    /// `Connect`'s address family byte did not match any entry in §6's table.
    #[error("unrecognised address family tag {tag:#04x}")]
    UnknownFamily { tag: u8 },
    /// The payload did not match the fixed shape this message type requires.
    #[error("payload did not match the expected shape for this message type")]
    Malformed,
}

/// Error from [`crate::decoder::Decoder::read_one`] (§7).
///
/// A thin wrapper: the only way decoding fails is a malformed frame. `NeedMore` and
/// `UnknownMessage` are not errors — see the module docs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct DecodeError(#[from] pub FramingError);

/// Error from [`crate::session::Session::feed_inbound`] / `feed_outbound` (§4.5, §7).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `msg_tag` is well-formed but illegal right now: wrong phase, wrong direction, or a
    /// negotiated flag forbids it.
    #[error(
        "message tag {msg_tag:?} ({direction:?}) is not legal in phase {phase:?}: {reason}"
    )]
    UnexpectedMessage {
        phase: Phase,
        direction: Direction,
        msg_tag: u8,
        reason: &'static str,
    },
    /// Negotiation failed to produce a usable session (§4.6).
    #[error("negotiation failed: {0}")]
    NegotiationError(#[from] NegotiationError),
    /// An outbound message was attempted before negotiation completed.
    #[error("no message may be sent before negotiation completes")]
    NotNegotiated,
}

/// Why [`crate::session::Session`] could not complete negotiation (§4.5, §4.6).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationError {
    /// The MTA's offered version is lower than the minimum this filter accepts.
    #[error("MTA offered protocol version {offered}, below the minimum {minimum} this filter accepts")]
    VersionTooOld { offered: u32, minimum: u32 },
    /// `Negotiate` was received/sent outside `PreNegotiate`.
    #[error("Negotiate is only legal before negotiation completes")]
    AlreadyNegotiated,
}
