//! Event messages: MTA → filter (§3, §4.2, §6).

use crate::{address::ConnectAddress, error::ValidationError};

/// An SMTP-session event sent by the MTA to the filter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// `C` — a new connection from a client.
    Connect { host: String, address: ConnectAddress },
    /// `H` — the client's `HELO`/`EHLO` argument.
    Helo { hostname: String },
    /// `K` — the envelope sender of a new transaction. Also documented (ambiguously) as "QUIT
    /// with new connection"; this implementation always treats tag `K` as `EnvelopeFrom` (§9).
    EnvelopeFrom { sender: String, args: Vec<String> },
    /// `R` — one envelope recipient.
    EnvelopeRecipient {
        recipient: String,
        args: Vec<String>,
    },
    /// `T` — the MTA is about to stream the message body.
    Data,
    /// `U` — an SMTP command the MTA did not recognise.
    Unknown { command: String },
    /// `L` — one message header.
    Header { name: String, value: String },
    /// `N` — end of the header block.
    EndOfHeaders,
    /// `B` — a chunk of the message body. Raw, unterminated bytes (§4.2).
    Body { chunk: Vec<u8> },
    /// `E` — end of message. Carries the MTA's notion of a final body chunk; see §9 for why
    /// this implementation does not treat it as equivalent to a trailing `Body` event.
    EndOfMessage { chunk: Vec<u8> },
    /// `A` — abort the current transaction; the session returns to `Greeted` (§4.5).
    Abort,
    /// `Q` — close the connection.
    Close,
}

impl Event {
    pub fn tag(&self) -> u8 {
        match self {
            Event::Connect { .. } => b'C',
            Event::Helo { .. } => b'H',
            Event::EnvelopeFrom { .. } => b'K',
            Event::EnvelopeRecipient { .. } => b'R',
            Event::Data => b'T',
            Event::Unknown { .. } => b'U',
            Event::Header { .. } => b'L',
            Event::EndOfHeaders => b'N',
            Event::Body { .. } => b'B',
            Event::EndOfMessage { .. } => b'E',
            Event::Abort => b'A',
            Event::Close => b'Q',
        }
    }

    pub fn connect(host: impl Into<String>, address: ConnectAddress) -> Result<Self, ValidationError> {
        let host = host.into();
        crate::error::check_no_nul(&host)?;
        Ok(Event::Connect { host, address })
    }

    pub fn helo(hostname: impl Into<String>) -> Result<Self, ValidationError> {
        let hostname = hostname.into();
        crate::error::check_no_nul(&hostname)?;
        Ok(Event::Helo { hostname })
    }

    pub fn envelope_from(
        sender: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let sender = sender.into();
        crate::error::check_no_nul(&sender)?;
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        for arg in &args {
            crate::error::check_no_nul(arg)?;
        }
        Ok(Event::EnvelopeFrom { sender, args })
    }

    pub fn envelope_recipient(
        recipient: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let recipient = recipient.into();
        crate::error::check_no_nul(&recipient)?;
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        for arg in &args {
            crate::error::check_no_nul(arg)?;
        }
        Ok(Event::EnvelopeRecipient { recipient, args })
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let value = value.into();
        crate::error::check_no_nul(&name)?;
        crate::error::check_no_nul(&value)?;
        Ok(Event::Header { name, value })
    }

    pub fn unknown(command: impl Into<String>) -> Result<Self, ValidationError> {
        let command = command.into();
        crate::error::check_no_nul(&command)?;
        Ok(Event::Unknown { command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_table() {
        assert_eq!(Event::Data.tag(), b'T');
        assert_eq!(Event::EndOfHeaders.tag(), b'N');
        assert_eq!(Event::Abort.tag(), b'A');
        assert_eq!(Event::Close.tag(), b'Q');
    }

    #[test]
    fn rejects_embedded_nul() {
        assert!(Event::helo("foo\0bar").is_err());
    }
}
