//! Internal `nom` error plumbing shared by [`crate::wire`] and [`crate::parse`].
//!
//! A small custom `nom` error type that carries enough detail to build a [`FramingError`] once
//! parsing fails, instead of nom's generic `ErrorKind`.

use nom::error::{ErrorKind, FromExternalError, ParseError};

use crate::error::FramingError;

/// An extended version of [`nom::IResult`], parameterized the same way `nom`'s combinators
/// expect: input type `I`, output type `O`.
pub(crate) type MilterResult<I, O> = Result<(I, O), nom::Err<MilterParseError<I>>>;

/// An extended version of [`nom::error::Error`] that remembers *why* a parse failed well enough
/// to map onto a [`FramingError`] variant, rather than nom's generic [`ErrorKind`].
#[derive(Debug)]
pub(crate) struct MilterParseError<I> {
    #[allow(unused)]
    pub input: I,
    pub kind: MilterErrorKind,
}

#[derive(Debug)]
pub(crate) enum MilterErrorKind {
    MissingTerminator,
    InvalidUtf8,
    OddMacroTable { count: usize },
    BadReplyCode,
    UnknownFamily { tag: u8 },
    Nom(ErrorKind),
}

impl<I> ParseError<I> for MilterParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: MilterErrorKind::Nom(kind),
        }
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I> FromExternalError<I, std::string::FromUtf8Error> for MilterParseError<I> {
    fn from_external_error(input: I, _kind: ErrorKind, _err: std::string::FromUtf8Error) -> Self {
        Self {
            input,
            kind: MilterErrorKind::InvalidUtf8,
        }
    }
}

impl MilterErrorKind {
    /// Maps a parse-time error kind onto the public [`FramingError`] surface (§7).
    pub(crate) fn into_framing_error(self) -> FramingError {
        match self {
            MilterErrorKind::MissingTerminator => FramingError::MissingTerminator,
            MilterErrorKind::InvalidUtf8 => FramingError::InvalidUtf8,
            MilterErrorKind::OddMacroTable { count } => FramingError::OddMacroTable { count },
            MilterErrorKind::BadReplyCode => FramingError::BadReplyCode,
            MilterErrorKind::UnknownFamily { tag } => FramingError::UnknownFamily { tag },
            MilterErrorKind::Nom(_) => FramingError::Malformed,
        }
    }
}

/// Converts a terminal `nom::Err` (this crate never produces `Incomplete`, since every parser
/// runs over a payload slice whose length is already fixed by the frame) into a [`FramingError`].
pub(crate) fn finish_error<I>(err: nom::Err<MilterParseError<I>>) -> FramingError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.kind.into_framing_error(),
        nom::Err::Incomplete(_) => FramingError::Malformed,
    }
}
