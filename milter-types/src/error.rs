//! Error-related types.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A validation error.
///
/// Returned by the validated constructors on [`crate::message`] types, e.g. when a string field
/// destined for the wire contains an embedded NUL byte and could therefore not be re-encoded as
/// a single null-terminated field.
#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub struct ValidationError {
    kind: ValidationErrorKind,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validation failed: {}", self.kind)
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum ValidationErrorKind {
    #[error("Must not be empty")]
    Empty,
    #[error("Must contain at least one recipient")]
    NoRecipients,
    #[error("Reply code must be 3 ASCII digits in the range 400-599")]
    InvalidReplyCode,
    #[error("Field contains an embedded NUL byte at index {at}")]
    EmbeddedNul { at: usize },
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind) -> Self {
        Self { kind }
    }
}

/// Ensures `s` contains no embedded NUL byte, since it will be encoded as a single
/// null-terminated field on the wire.
pub(crate) fn check_no_nul(s: &str) -> Result<(), ValidationError> {
    if let Some(at) = s.bytes().position(|b| b == 0) {
        return Err(ValidationError::new(ValidationErrorKind::EmbeddedNul { at }));
    }
    Ok(())
}
