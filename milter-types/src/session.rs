//! # Session phase diagram
//!
//! A milter session moves through the following phases (§4.5). Most message kinds are only
//! legal in particular phases; a message arriving in the wrong phase is a protocol error and the
//! driving [`Session`](../../milter_codec/session/struct.Session.html) in `milter-codec` rejects
//! it rather than advancing.
//!
//! ```text
//! PreNegotiate ── Negotiate ──▶ Negotiated
//! Negotiated  ── Connect   ──▶ Connected
//! Connected   ── Helo      ──▶ Greeted          (Helo may repeat)
//! Greeted|Connected ── EnvelopeFrom ──▶ Envelope
//! Envelope    ── EnvelopeRecipient ──▶ Envelope  (one or more)
//! Envelope    ── Data      ──▶ Data
//! Data|Envelope ── Header   ──▶ Headers          (Header self-loop)
//! Headers     ── EndOfHeaders ──▶ Body
//! Body        ── Body       ──▶ Body             (self-loop)
//! Body        ── EndOfMessage ──▶ AwaitingEom
//! AwaitingEom ── (modifications)*  ──▶ AwaitingEom
//! AwaitingEom ── response  ──▶ Greeted            (next transaction)
//! any post-Greeted ── Abort ──▶ Greeted           (transaction reset)
//! any ── Close ──▶ Closed
//! ```

/// A milter session's current position in the phase diagram above.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No `Negotiate` has been exchanged yet.
    PreNegotiate,
    /// Negotiation completed; waiting for `Connect`.
    Negotiated,
    /// `Connect` received; waiting for `Helo` or the start of a transaction.
    Connected,
    /// `Helo` received at least once.
    Greeted,
    /// Inside the envelope: one `EnvelopeFrom` and zero or more `EnvelopeRecipient`.
    Envelope,
    /// `Data` received; waiting for headers.
    Data,
    /// At least one `Header` received; waiting for more headers or `EndOfHeaders`.
    Headers,
    /// Past `EndOfHeaders`; consuming zero or more `Body` chunks.
    Body,
    /// Past `EndOfMessage`; modifications may be sent until the filter's final response.
    AwaitingEom,
    /// `Close` received; no further messages are legal.
    Closed,
}

/// Which side of the session a message travels.
///
/// Events travel MTA→filter (`Inbound`); responses and modifications travel filter→MTA
/// (`Outbound`). `Negotiate` and `Macro` may appear in either direction at the appropriate point
/// (§4.5 "origin" check).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// MTA → filter.
    Inbound,
    /// filter → MTA.
    Outbound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_comparable() {
        assert_eq!(Phase::Body, Phase::Body);
        assert_ne!(Phase::Body, Phase::Headers);
    }

    #[test]
    fn direction_is_copy() {
        let d = Direction::Inbound;
        let d2 = d;
        assert_eq!(d, d2);
    }
}
