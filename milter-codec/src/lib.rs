#![deny(missing_debug_implementations)]

//! Sans-I/O codec and session state machine for the
//! [milter](https://www.postfix.org/MILTER_README.html) wire protocol.
//!
//! This crate only transforms values: [`wire`] and [`codec`] turn bytes into
//! [`milter_types::message::Message`]s and back, [`decoder::Decoder`] buffers a byte stream into
//! complete frames, and [`session::Session`] tracks which messages are legal next. Nothing here
//! touches a socket; callers drive the actual I/O (§1, §9).

pub mod codec;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod session;
pub mod wire;

mod decode;
mod parse;

#[cfg(test)]
mod testing;

pub use codec::{Encode, MessageCodec};
pub use decoder::Decoder;
pub use error::{DecodeError, FramingError, NegotiationError, SessionError};
pub use session::Session;

pub use milter_types;
