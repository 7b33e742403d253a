//! Response messages: filter → MTA verdicts (§3, §4.2, §6).

use crate::error::{ValidationError, ValidationErrorKind};

/// A per-event verdict the filter sends back to the MTA.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    /// `c` — proceed as normal.
    Continue,
    /// `r` — reject with a permanent failure.
    Reject,
    /// `d` — accept this event, discard the rest of the message silently.
    Discard,
    /// `a` — accept the whole message without further filtering.
    Accept,
    /// `t` — reject with a temporary failure (4xx).
    TemporaryFailure,
    /// `s` — stop sending body chunks; legal only from `Body` and only when `SKIP` was
    /// negotiated (§4.5).
    Skip,
    /// `y` — reply with a specific SMTP code and text.
    ReplyCode(ReplyCode),
}

/// The payload of a [`Response::ReplyCode`]: `code(3 ASCII digits) ' ' text(cstring)` (§4.2).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyCode {
    code: u16,
    text: String,
}

impl ReplyCode {
    /// Builds a reply code, validating that `code` is a 3-digit SMTP code starting with `4` or
    /// `5` (§4.2: "must be digits in `'4'..'5'` for the leading").
    pub fn new(code: u16, text: impl Into<String>) -> Result<Self, ValidationError> {
        if !(400..=599).contains(&code) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidReplyCode));
        }
        let text = text.into();
        crate::error::check_no_nul(&text)?;
        Ok(Self { code, text })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Response {
    pub fn tag(&self) -> u8 {
        match self {
            Response::Continue => b'c',
            Response::Reject => b'r',
            Response::Discard => b'd',
            Response::Accept => b'a',
            Response::TemporaryFailure => b't',
            Response::Skip => b's',
            Response::ReplyCode(_) => b'y',
        }
    }

    /// True for the responses with no payload (§4.2); everything else must decode to exactly
    /// an empty payload or it is a framing error.
    pub fn is_empty_payload(&self) -> bool {
        !matches!(self, Response::ReplyCode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_code_rejects_out_of_range() {
        assert!(ReplyCode::new(200, "ok").is_err());
        assert!(ReplyCode::new(999, "ok").is_err());
        assert!(ReplyCode::new(451, "slow").is_ok());
    }

    #[test]
    fn tags_match_table() {
        assert_eq!(Response::Continue.tag(), b'c');
        assert_eq!(Response::Skip.tag(), b's');
    }
}
