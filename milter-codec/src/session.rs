//! Session state machine (§4.5, §4.6): enforces the legal order of messages across a milter
//! session and computes the next phase from each accepted message.

use std::collections::HashSet;

use milter_types::{
    flags::{ActionFlags, ProtocolFlags},
    message::{event::Event, modification::Modification, response::Response, Message, Negotiate},
    session::{Direction, Phase},
};

use crate::error::{NegotiationError, SessionError};

/// One milter session: negotiated flags, current phase, and the small amount of bookkeeping
/// needed to enforce §4.5's extra flag-gated rules.
#[derive(Debug, Clone)]
pub struct Session {
    /// What this filter asked for at construction; intersected with the MTA's offer once
    /// `Negotiate` arrives (§4.6).
    desired: Negotiate,
    /// The minimum protocol version this filter is willing to run (§4.5 `NegotiationError`).
    minimum_version: u32,
    /// `Some` once negotiation has completed.
    accepted: Option<Negotiate>,
    phase: Phase,
    /// Number of `EnvelopeRecipient` events accepted in the current transaction (§3, informational).
    recipient_count: u32,
    /// Set once a `Skip` response is sent from `Body`: the MTA must now send `EndOfMessage`
    /// directly, without further `Body` chunks (§4.5 scenario S4).
    skip_active: bool,
    /// Misc tags the caller has opted in to receiving despite §9's default rejection.
    allowed_misc: HashSet<u8>,
}

impl Session {
    /// Creates a fresh session in `PreNegotiate`, wanting `desired` out of negotiation and
    /// refusing any MTA offering less than `minimum_version`.
    pub fn new(desired: Negotiate, minimum_version: u32) -> Self {
        Self {
            desired,
            minimum_version,
            accepted: None,
            phase: Phase::PreNegotiate,
            recipient_count: 0,
            skip_active: false,
            allowed_misc: HashSet::new(),
        }
    }

    /// The session's current phase (§4.5).
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The negotiated parameters, once negotiation has completed.
    pub fn accepted(&self) -> Option<&Negotiate> {
        self.accepted.as_ref()
    }

    /// Number of `EnvelopeRecipient` events accepted in the current transaction.
    pub fn recipient_count(&self) -> u32 {
        self.recipient_count
    }

    /// Opts in to receiving the reserved/undocumented `Misc` tag `tag` as a legal inbound
    /// message, rather than rejecting it as `UnexpectedMessage` (§9).
    pub fn allow_misc(&mut self, tag: u8) {
        self.allowed_misc.insert(tag);
    }

    fn actions(&self) -> ActionFlags {
        self.accepted.as_ref().map(|n| n.actions).unwrap_or(ActionFlags::NONE)
    }

    fn protocol(&self) -> ProtocolFlags {
        self.accepted.as_ref().map(|n| n.protocol).unwrap_or(ProtocolFlags::NONE)
    }

    /// Feeds a message the MTA sent to the filter (§4.5).
    pub fn feed_inbound(&mut self, message: &Message) -> Result<(), SessionError> {
        self.feed(Direction::Inbound, message)
    }

    /// Feeds a message the filter sent to the MTA (§4.5).
    pub fn feed_outbound(&mut self, message: &Message) -> Result<(), SessionError> {
        self.feed(Direction::Outbound, message)
    }

    fn reject(&self, direction: Direction, message: &Message, reason: &'static str) -> SessionError {
        SessionError::UnexpectedMessage {
            phase: self.phase,
            direction,
            msg_tag: message.tag(),
            reason,
        }
    }

    fn feed(&mut self, direction: Direction, message: &Message) -> Result<(), SessionError> {
        match message {
            Message::Negotiate(negotiate) => self.feed_negotiate(direction, negotiate, message),
            Message::Macro(_) => self.feed_macro(direction, message),
            Message::Event(event) => self.feed_event(direction, event, message),
            Message::Response(response) => self.feed_response(direction, response, message),
            Message::Modification(modification) => {
                self.feed_modification(direction, modification, message)
            }
            Message::Misc(misc) => {
                if direction == Direction::Inbound && self.allowed_misc.contains(&misc.tag) {
                    log::debug!("milter-codec: allowing opted-in misc tag {:#04x}", misc.tag);
                    Ok(())
                } else {
                    log::warn!("milter-codec: rejecting misc tag {:#04x}", misc.tag);
                    Err(self.reject(direction, message, "misc tags are rejected unless opted in via allow_misc"))
                }
            }
        }
    }

    fn feed_negotiate(
        &mut self,
        direction: Direction,
        negotiate: &Negotiate,
        _message: &Message,
    ) -> Result<(), SessionError> {
        if self.phase != Phase::PreNegotiate {
            return Err(SessionError::NegotiationError(NegotiationError::AlreadyNegotiated));
        }

        match direction {
            Direction::Inbound => {
                if negotiate.version < self.minimum_version {
                    return Err(SessionError::NegotiationError(NegotiationError::VersionTooOld {
                        offered: negotiate.version,
                        minimum: self.minimum_version,
                    }));
                }
                let accepted = Negotiate::intersect(negotiate, &self.desired);
                log::debug!(
                    "milter-codec: negotiated version={} actions={:#x} protocol={:#x}",
                    accepted.version,
                    accepted.actions.bits(),
                    accepted.protocol.bits()
                );
                self.accepted = Some(accepted);
                Ok(())
            }
            Direction::Outbound => {
                if self.accepted.is_none() {
                    return Err(SessionError::NotNegotiated);
                }
                self.phase = Phase::Negotiated;
                Ok(())
            }
        }
    }

    fn feed_macro(&mut self, direction: Direction, message: &Message) -> Result<(), SessionError> {
        if direction != Direction::Inbound {
            return Err(self.reject(direction, message, "Macro only ever travels MTA to filter"));
        }
        if matches!(self.phase, Phase::PreNegotiate | Phase::Closed) {
            return Err(self.reject(direction, message, "Macro is not legal before negotiation or after Close"));
        }
        Ok(())
    }

    fn feed_event(&mut self, direction: Direction, event: &Event, message: &Message) -> Result<(), SessionError> {
        if direction != Direction::Inbound {
            return Err(self.reject(direction, message, "events only ever travel MTA to filter"));
        }

        if let Some(flag) = skip_flag_for(event) {
            if self.protocol().contains(flag) {
                return Err(self.reject(direction, message, "MTA sent an event it negotiated to skip"));
            }
        }

        use Phase::*;
        let next = match (self.phase, event) {
            (Negotiated, Event::Connect { .. }) => Connected,
            (Connected, Event::Helo { .. }) | (Greeted, Event::Helo { .. }) => Greeted,
            (Connected, Event::EnvelopeFrom { .. }) | (Greeted, Event::EnvelopeFrom { .. }) => {
                self.recipient_count = 0;
                Envelope
            }
            (Envelope, Event::EnvelopeRecipient { .. }) => {
                self.recipient_count += 1;
                Envelope
            }
            (Envelope, Event::Data) => Data,
            (Envelope | Data | Headers, Event::Header { .. }) => Headers,
            (Data, Event::EndOfHeaders) | (Headers, Event::EndOfHeaders) => Body,
            (Body, Event::Body { .. }) if !self.skip_active => Body,
            (Body, Event::EndOfMessage { .. }) => {
                self.skip_active = false;
                AwaitingEom
            }
            (Connected | Greeted | Envelope | Data | Headers, Event::Unknown { .. }) => self.phase,
            (_, Event::Abort) if !matches!(self.phase, PreNegotiate | Negotiated | Closed) => Greeted,
            (_, Event::Close) => Closed,
            _ => return Err(self.reject(direction, message, "event is not legal in the current phase")),
        };

        log::trace!("milter-codec: {:?} -> {:?} on {:?}", self.phase, next, event);
        self.phase = next;
        Ok(())
    }

    fn feed_response(
        &mut self,
        direction: Direction,
        response: &Response,
        message: &Message,
    ) -> Result<(), SessionError> {
        if direction != Direction::Outbound {
            return Err(self.reject(direction, message, "responses only ever travel filter to MTA"));
        }
        if self.accepted.is_none() {
            return Err(SessionError::NotNegotiated);
        }
        if matches!(self.phase, Phase::Negotiated | Phase::Closed) {
            return Err(self.reject(direction, message, "no event is outstanding to respond to"));
        }

        if matches!(response, Response::Skip) {
            if self.phase != Phase::Body {
                return Err(self.reject(direction, message, "Skip is only legal from the Body phase"));
            }
            if !self.protocol().contains(ProtocolFlags::SKIP) {
                return Err(self.reject(direction, message, "Skip was not negotiated"));
            }
            self.skip_active = true;
            return Ok(());
        }

        if matches!(response, Response::ReplyCode(_)) && !self.protocol().contains(ProtocolFlags::REPLY_CODE) {
            return Err(self.reject(direction, message, "ReplyCode was not negotiated"));
        }

        if self.phase == Phase::AwaitingEom {
            self.phase = Phase::Greeted;
        }
        Ok(())
    }

    fn feed_modification(
        &mut self,
        direction: Direction,
        modification: &Modification,
        message: &Message,
    ) -> Result<(), SessionError> {
        if direction != Direction::Outbound {
            return Err(self.reject(direction, message, "modifications only ever travel filter to MTA"));
        }
        if self.phase != Phase::AwaitingEom {
            return Err(self.reject(direction, message, "modifications are only legal after EndOfMessage, before the final response"));
        }
        if let Some(required) = modification.required_action() {
            if !self.actions().contains(required) {
                return Err(self.reject(direction, message, "this modification's action was not negotiated"));
            }
        }
        Ok(())
    }
}

/// The [`ProtocolFlags`] "must not send" bit that gates `event`, if any (§4.5, §6).
fn skip_flag_for(event: &Event) -> Option<ProtocolFlags> {
    match event {
        Event::Connect { .. } => Some(ProtocolFlags::NO_CONNECT),
        Event::Helo { .. } => Some(ProtocolFlags::NO_HELO),
        Event::EnvelopeFrom { .. } => Some(ProtocolFlags::NO_MAIL),
        Event::EnvelopeRecipient { .. } => Some(ProtocolFlags::NO_RCPT),
        Event::Data => Some(ProtocolFlags::NO_DATA),
        Event::Header { .. } => Some(ProtocolFlags::NO_HDRS),
        Event::EndOfHeaders => Some(ProtocolFlags::NO_EOH),
        Event::Body { .. } => Some(ProtocolFlags::NO_BODY),
        Event::Unknown { .. } => Some(ProtocolFlags::NO_UNKNOWN),
        Event::EndOfMessage { .. } | Event::Abort | Event::Close => None,
    }
}
