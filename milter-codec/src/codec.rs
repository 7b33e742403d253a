//! Top-level encode/decode entry points (§4.2, §4.4).
//!
//! A single closed [`Message`] sum rather than one type per grammar production, since milter's
//! message set is small and fixed.

use milter_types::message::Message;

use crate::{encode::payload_bytes, error::FramingError, parse, wire};

/// Encodes a value into its complete wire representation (§4.4).
pub trait Encode {
    /// Serializes `self` into a complete frame: `u32 size ‖ u8 tag ‖ payload`.
    fn encode(&self) -> Vec<u8>;
}

impl Encode for Message {
    fn encode(&self) -> Vec<u8> {
        let payload = payload_bytes(self);
        let mut out = Vec::with_capacity(5 + payload.len());
        wire::write_frame(self.tag(), &payload, &mut out);
        out
    }
}

/// Stateless codec for a single already-framed `(tag, payload)` pair (§4.2).
///
/// Most callers should use [`crate::decoder::Decoder`] instead, which additionally buffers
/// partial frames read from a byte stream (§4.3); `MessageCodec` is the single-frame primitive
/// the decoder is built on, and is also handy in tests that already have a split frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageCodec;

impl MessageCodec {
    /// Parses one frame's tag and payload into a [`Message`] (§4.2).
    pub fn decode(&self, tag: u8, payload: &[u8]) -> Result<Message, FramingError> {
        parse::message(tag, payload)
    }

    /// Serializes a [`Message`] into a complete frame (§4.4). Equivalent to
    /// [`Encode::encode`], kept as an inherent method for symmetry with [`MessageCodec::decode`].
    pub fn encode(&self, message: &Message) -> Vec<u8> {
        message.encode()
    }
}
