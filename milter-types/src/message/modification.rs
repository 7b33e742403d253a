//! Modification messages: filter → MTA post-message edits (§3, §4.2, §6).
//!
//! Legal only inside the `AwaitingEom` phase, and only when the corresponding
//! [`ActionFlags`](crate::flags::ActionFlags) bit was negotiated (§4.5).

use crate::{error::ValidationError, flags::ActionFlags};

/// One post-`EndOfMessage` edit the filter asks the MTA to apply.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Modification {
    /// `h` — append a header.
    AddHeader { name: String, value: String },
    /// `m` — replace (or, with an empty value, delete) the header at the 1-based `index`
    /// occurrence of that field name.
    ChangeHeader {
        index: u32,
        name: String,
        value: String,
    },
    /// `i` — insert a header at a specific position.
    InsertHeader {
        index: u32,
        name: String,
        value: String,
    },
    /// `e` — replace the envelope sender, optionally with new ESMTP args.
    ChangeSender {
        address: String,
        args: Option<String>,
    },
    /// `+` — add a recipient.
    AddRecipient { address: String },
    /// `2` — add a recipient with ESMTP args.
    AddRecipientPar { address: String, args: String },
    /// `-` — remove a recipient.
    RemoveRecipient { address: String },
    /// `b` — replace the message body. Raw, unterminated bytes (§4.2).
    ReplaceBody { data: Vec<u8> },
    /// `p` — keep-alive; resets the MTA's read timeout without otherwise changing anything.
    Progress,
    /// `q` — quarantine the message with a human-readable reason.
    Quarantine { reason: String },
}

impl Modification {
    pub fn tag(&self) -> u8 {
        match self {
            Modification::AddHeader { .. } => b'h',
            Modification::ChangeHeader { .. } => b'm',
            Modification::InsertHeader { .. } => b'i',
            Modification::ChangeSender { .. } => b'e',
            Modification::AddRecipient { .. } => b'+',
            Modification::AddRecipientPar { .. } => b'2',
            Modification::RemoveRecipient { .. } => b'-',
            Modification::ReplaceBody { .. } => b'b',
            Modification::Progress => b'p',
            Modification::Quarantine { .. } => b'q',
        }
    }

    /// The [`ActionFlags`] bit that must have been negotiated for this modification to be legal
    /// (§4.5). `Progress` needs no bit: it carries no state-affecting action.
    pub fn required_action(&self) -> Option<ActionFlags> {
        match self {
            Modification::AddHeader { .. } => Some(ActionFlags::ADD_HEADERS),
            Modification::ChangeHeader { .. } => Some(ActionFlags::CHANGE_HEADERS),
            Modification::InsertHeader { .. } => Some(ActionFlags::ADD_HEADERS),
            Modification::ChangeSender { .. } => Some(ActionFlags::CHANGE_FROM),
            Modification::AddRecipient { .. } => Some(ActionFlags::ADD_RCPT),
            Modification::AddRecipientPar { .. } => Some(ActionFlags::ADD_RCPT_PAR),
            Modification::RemoveRecipient { .. } => Some(ActionFlags::DEL_RCPT),
            Modification::ReplaceBody { .. } => Some(ActionFlags::CHANGE_BODY),
            Modification::Progress => None,
            Modification::Quarantine { .. } => Some(ActionFlags::QUARANTINE),
        }
    }

    pub fn add_header(name: impl Into<String>, value: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let value = value.into();
        crate::error::check_no_nul(&name)?;
        crate::error::check_no_nul(&value)?;
        Ok(Modification::AddHeader { name, value })
    }

    pub fn change_sender(
        address: impl Into<String>,
        args: Option<impl Into<String>>,
    ) -> Result<Self, ValidationError> {
        let address = address.into();
        crate::error::check_no_nul(&address)?;
        let args = args.map(Into::into);
        if let Some(args) = &args {
            crate::error::check_no_nul(args)?;
        }
        Ok(Modification::ChangeSender { address, args })
    }

    pub fn quarantine(reason: impl Into<String>) -> Result<Self, ValidationError> {
        let reason = reason.into();
        crate::error::check_no_nul(&reason)?;
        Ok(Modification::Quarantine { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_table() {
        assert_eq!(Modification::Progress.tag(), b'p');
        assert_eq!(Modification::AddRecipient { address: "a".into() }.tag(), b'+');
    }

    #[test]
    fn required_action_matches_flag_table() {
        assert_eq!(
            Modification::Quarantine {
                reason: "x".into()
            }
            .required_action(),
            Some(ActionFlags::QUARANTINE)
        );
        assert_eq!(Modification::Progress.required_action(), None);
    }
}
