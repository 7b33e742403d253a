//! The milter message family (§3, §6).
//!
//! Messages are grouped into five families, mirroring the grouping in the tag table: `setup`
//! (negotiation and macros), `event` (MTA→filter), `response` (filter→MTA verdicts),
//! `modification` (filter→MTA post-message edits), and `misc` (reserved/undocumented tags).
//! [`Message`] is the closed sum over all of them.

pub mod event;
pub mod misc;
pub mod modification;
pub mod response;
pub mod setup;

pub use event::Event;
pub use misc::Misc;
pub use modification::Modification;
pub use response::Response;
pub use setup::{Macro, MacroRequest, Negotiate};

/// Which of the five families in §3 a [`Message`] belongs to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Setup,
    Event,
    Response,
    Modification,
    Misc,
}

/// The full milter message family: a closed, tagged sum over every message kind the wire
/// protocol defines.
///
/// Modelled as a Rust enum rather than the dynamically-dispatched class hierarchy the protocol
/// is usually implemented with (§9 "Polymorphism over message family"): dispatch on the 1-byte
/// tag is exhaustive and a forgotten variant is a compile error, not a runtime surprise.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Negotiate(Negotiate),
    Macro(Macro),
    Event(Event),
    Response(Response),
    Modification(Modification),
    Misc(Misc),
}

impl Message {
    /// The 1-byte tag this message encodes to (§6).
    pub fn tag(&self) -> u8 {
        match self {
            Message::Negotiate(_) => b'O',
            Message::Macro(_) => b'D',
            Message::Event(event) => event.tag(),
            Message::Response(response) => response.tag(),
            Message::Modification(modification) => modification.tag(),
            Message::Misc(misc) => misc.tag,
        }
    }

    /// The message family this tag belongs to, used by the session state machine to look up
    /// the phase/direction legality tables without a second exhaustive match (§4.5).
    pub fn family(&self) -> Family {
        match self {
            Message::Negotiate(_) | Message::Macro(_) => Family::Setup,
            Message::Event(_) => Family::Event,
            Message::Response(_) => Family::Response,
            Message::Modification(_) => Family::Modification,
            Message::Misc(_) => Family::Misc,
        }
    }
}

impl From<Negotiate> for Message {
    fn from(value: Negotiate) -> Self {
        Message::Negotiate(value)
    }
}

impl From<Macro> for Message {
    fn from(value: Macro) -> Self {
        Message::Macro(value)
    }
}

impl From<Event> for Message {
    fn from(value: Event) -> Self {
        Message::Event(value)
    }
}

impl From<Response> for Message {
    fn from(value: Response) -> Self {
        Message::Response(value)
    }
}

impl From<Modification> for Message {
    fn from(value: Modification) -> Self {
        Message::Modification(value)
    }
}

impl From<Misc> for Message {
    fn from(value: Misc) -> Self {
        Message::Misc(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_dispatch() {
        assert_eq!(Message::from(Response::Continue).family(), Family::Response);
        assert_eq!(
            Message::from(Misc {
                tag: b'4',
                payload: vec![]
            })
            .family(),
            Family::Misc
        );
    }

    #[test]
    fn tag_matches_table() {
        assert_eq!(Message::from(Response::Continue).tag(), b'c');
        assert_eq!(Message::from(Response::Accept).tag(), b'a');
    }
}
