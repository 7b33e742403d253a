//! Known-answer-test helpers (`known_answer_test_encode`, `kat_inverse_*`) for milter's binary
//! frame format (§8 property 1 "Round-trip").

use milter_types::{message::Message, utils::escape_byte_string};

use crate::{
    codec::{Encode, MessageCodec},
    wire::{self, DEFAULT_MAX_FRAME_SIZE},
};

/// Asserts that encoding `message` produces exactly `expected_bytes`.
pub(crate) fn known_answer_test_encode(message: &Message, expected_bytes: &[u8]) {
    let got = message.encode();

    if got != expected_bytes {
        println!(
            "Left (expected):  <<<{}>>>\nRight (got):      <<<{}>>>",
            escape_byte_string(expected_bytes),
            escape_byte_string(&got),
        );
        panic!(
            "encoding mismatch:\nexpected: {:02x?}\ngot:      {:02x?}",
            expected_bytes, got
        );
    }
}

/// Asserts `decode(encode(message)) == message` for a single, already-built message (§8
/// property 1).
pub(crate) fn kat_inverse_message(message: Message) {
    let codec = MessageCodec;
    let bytes = codec.encode(&message);

    let frame = wire::read_frame(&bytes, DEFAULT_MAX_FRAME_SIZE)
        .expect("encode() must never produce an oversized frame")
        .expect("encode() must never produce an incomplete frame");

    let decoded = codec.decode(frame.tag, frame.payload).expect("decode() failed on our own encode() output");

    assert_eq!(message, decoded, "message did not round-trip through encode/decode");
}

#[cfg(test)]
mod tests {
    use milter_types::message::response::Response;

    use super::*;

    #[test]
    fn continue_is_a_single_tag_byte_frame() {
        known_answer_test_encode(&Message::Response(Response::Continue), b"\x00\x00\x00\x01c");
    }

    #[test]
    fn continue_round_trips() {
        kat_inverse_message(Message::Response(Response::Continue));
    }
}
