//! Flag-related types.
//!
//! Both bit-fields are thin wrappers around the raw `u32` that travels on the wire. Bits this
//! crate does not know the meaning of are preserved across decode/encode round-trips instead of
//! being silently dropped, the same way [`crate::message`] keeps unrecognised tags around as
//! [`crate::message::misc::Misc`] rather than discarding them.

use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

macro_rules! bitfield {
    (
        $(#[$outer:meta])*
        $name:ident { $($(#[$inner:meta])* $variant:ident = $bit:expr),+ $(,)? }
    ) => {
        $(#[$outer])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$inner])*
                pub const $variant: Self = Self($bit);
            )+

            /// The empty flag set.
            pub const NONE: Self = Self(0);

            /// Builds a flag set from a raw `u32` as seen on the wire, preserving bits this
            /// crate does not assign a name to.
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            /// Returns the raw `u32` as it should be re-encoded on the wire.
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// True if every bit set in `other` is also set in `self`.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// True if `self` and `other` have no bits in common.
            pub const fn is_disjoint(self, other: Self) -> bool {
                self.0 & other.0 == 0
            }

            /// Bitwise intersection, used by negotiation (§4.6) to compute the flags both the
            /// MTA and the filter agree on.
            pub const fn intersection(self, other: Self) -> Self {
                Self(self.0 & other.0)
            }

            /// Bitwise union.
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }
        }

        impl BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                *self = *self | rhs;
            }
        }

        impl BitAnd for $name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                self.intersection(rhs)
            }
        }

        impl Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self(!self.0)
            }
        }

        impl From<u32> for $name {
            fn from(bits: u32) -> Self {
                Self::from_bits(bits)
            }
        }

        impl From<$name> for u32 {
            fn from(flags: $name) -> u32 {
                flags.bits()
            }
        }
    };
}

bitfield! {
    /// Modifications a filter may ask the MTA to perform after `EndOfMessage`.
    ///
    /// Negotiated once, at the start of a session (§4.6); a modification message whose bit is
    /// not set here is illegal (§4.5) no matter the session phase.
    ActionFlags {
        /// Filter may add headers (`AddHeader`).
        ADD_HEADERS = 0x0000_0001,
        /// Filter may replace the message body (`ReplaceBody`).
        CHANGE_BODY = 0x0000_0002,
        /// Filter may add a recipient (`AddRecipient`).
        ADD_RCPT = 0x0000_0004,
        /// Filter may remove a recipient (`RemoveRecipient`).
        DEL_RCPT = 0x0000_0008,
        /// Filter may change or delete headers (`ChangeHeader`).
        CHANGE_HEADERS = 0x0000_0010,
        /// Filter may quarantine the message (`Quarantine`).
        QUARANTINE = 0x0000_0020,
        /// Filter may change the envelope sender (`ChangeSender`).
        CHANGE_FROM = 0x0000_0040,
        /// Filter may add a recipient with ESMTP args (`AddRecipientPar`).
        ADD_RCPT_PAR = 0x0000_0080,
        /// Filter may send a new macro symbol list (`SetSymbolList`).
        SETSYMLIST = 0x0000_0100,
    }
}

bitfield! {
    /// Events a filter opts out of, plus feature bits, negotiated at session start (§4.6).
    ///
    /// A `NO_*` bit means the corresponding event MUST NOT be sent to the filter; the state
    /// machine treats an arriving skipped event as [`crate::session`] legality violation.
    ProtocolFlags {
        /// MTA must not send `Connect`.
        NO_CONNECT = 0x0000_0001,
        /// MTA must not send `Helo`.
        NO_HELO = 0x0000_0002,
        /// MTA must not send `EnvelopeFrom`.
        NO_MAIL = 0x0000_0004,
        /// MTA must not send `EnvelopeRecipient`.
        NO_RCPT = 0x0000_0008,
        /// MTA must not send `Body`.
        NO_BODY = 0x0000_0010,
        /// MTA must not send `Header`.
        NO_HDRS = 0x0000_0020,
        /// MTA must not send `EndOfHeaders`.
        NO_EOH = 0x0000_0040,
        /// Filter may reply with [`Skip`](crate::message::response::Response::Skip) from the
        /// `Body` phase.
        SKIP = 0x0000_0400,
        /// MTA must not send `Unknown` (unrecognised SMTP command) events.
        NO_UNKNOWN = 0x0000_0100,
        /// MTA must not send `Data`.
        NO_DATA = 0x0000_0200,
        /// A rejected recipient may still appear in a subsequent `EnvelopeRecipient`.
        REJECTED_RCPT = 0x0000_0800,
        /// Filter may reply with [`ReplyCode`](crate::message::response::Response::ReplyCode)
        /// instead of the fixed verdicts; absent, a `ReplyCode` response is rejected the same
        /// way an un-negotiated `Skip` is (§4.5 "ReplyCode response is legal ... only if
        /// reply-codes were not excluded by negotiation").
        REPLY_CODE = 0x0020_0000,
        /// No response required after `Connect`.
        NR_CONN = 0x0000_1000,
        /// No response required after `Helo`.
        NR_HELO = 0x0000_2000,
        /// No response required after `EnvelopeFrom`.
        NR_MAIL = 0x0000_4000,
        /// No response required after `EnvelopeRecipient`.
        NR_RCPT = 0x0000_8000,
        /// No response required after `Data`.
        NR_DATA = 0x0001_0000,
        /// No response required after `Unknown`.
        NR_UNKN = 0x0002_0000,
        /// No response required after `EndOfHeaders`.
        NR_EOH = 0x0004_0000,
        /// No response required after `Header`.
        NR_HDR = 0x0008_0000,
        /// MTA may include a leading space in `Header`'s value payload.
        HDR_LEADSPC = 0x0010_0000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_bits_survive_round_trip() {
        let flags = ActionFlags::from_bits(0xFFFF_FFFF);
        assert_eq!(flags.bits(), 0xFFFF_FFFF);
        assert!(flags.contains(ActionFlags::ADD_HEADERS));
    }

    #[test]
    fn intersection_keeps_only_shared_bits() {
        let mta = ActionFlags::ADD_HEADERS | ActionFlags::CHANGE_BODY | ActionFlags::QUARANTINE;
        let filter = ActionFlags::ADD_HEADERS | ActionFlags::CHANGE_FROM;
        let agreed = mta.intersection(filter);
        assert!(agreed.contains(ActionFlags::ADD_HEADERS));
        assert!(!agreed.contains(ActionFlags::CHANGE_BODY));
        assert!(!agreed.contains(ActionFlags::CHANGE_FROM));
    }

    #[test]
    fn protocol_flags_skip_gating() {
        let flags = ProtocolFlags::from_bits(0) | ProtocolFlags::SKIP;
        assert!(flags.contains(ProtocolFlags::SKIP));
        assert!(!flags.contains(ProtocolFlags::NO_BODY));
    }
}
