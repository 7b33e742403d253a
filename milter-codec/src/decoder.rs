//! Streaming decoder (§4.3): buffers arbitrary byte chunks and yields complete messages.
//!
//! Pull-based and re-entrant: a buffer plus a "make progress" step, specialized to milter's
//! simple length-prefixed framing. There is no continuation handshake, so one frame is always
//! either fully buffered or not buffered at all (§9 "Coroutine-style API").

use milter_types::message::Message;

use crate::{
    codec::MessageCodec,
    error::FramingError,
    wire::{self, DEFAULT_MAX_FRAME_SIZE},
};

/// Accumulates bytes fed from an I/O collaborator and pops off complete [`Message`]s.
///
/// Never blocks and never loses data: [`Decoder::feed`] only appends, and
/// [`Decoder::read_one`] only advances its internal cursor past a frame it has fully parsed
/// (§3 "Decoder buffer" invariant).
#[derive(Debug, Clone)]
pub struct Decoder {
    buffer: Vec<u8>,
    max_frame_size: u32,
    codec: MessageCodec,
}

impl Decoder {
    /// Creates a decoder that rejects any frame declaring a size over `max_frame_size` (§4.1).
    pub fn new(max_frame_size: u32) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_size,
            codec: MessageCodec,
        }
    }

    /// Creates a decoder using the default frame size limit of `2^20` bytes (§4.1).
    pub fn with_default_limit() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Appends `bytes` to the internal buffer. Never blocks, never fails (§4.3).
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        log::trace!("milter-codec: buffered {} byte(s)", bytes.len());
    }

    /// Attempts to pop a single complete message off the front of the buffer (§4.3).
    ///
    /// `Ok(None)` is the non-fatal "NeedMore" signal: the caller should [`Decoder::feed`] more
    /// bytes and retry. `Err` is terminal for the session; the byte stream is no longer
    /// recoverable (§7).
    pub fn read_one(&mut self) -> Result<Option<Message>, FramingError> {
        let frame = match wire::read_frame(&self.buffer, self.max_frame_size)? {
            Some(frame) => frame,
            None => return Ok(None),
        };

        let message = self.codec.decode(frame.tag, frame.payload)?;
        let consumed = frame.consumed;
        // `frame` borrows `self.buffer`; it must be dropped before the buffer can be mutated.
        drop(frame);

        self.buffer.drain(..consumed);
        log::debug!(
            "milter-codec: decoded tag={:?} ({consumed} byte(s) consumed, {} buffered)",
            message.tag() as char,
            self.buffer.len()
        );
        Ok(Some(message))
    }

    /// A lazy sequence of decoded messages, stopping at the next `NeedMore` or error (§4.3).
    pub fn read_many(&mut self) -> ReadMany<'_> {
        ReadMany { decoder: self }
    }

    /// Bytes buffered but not yet consumed by a complete frame.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::with_default_limit()
    }
}

/// Iterator returned by [`Decoder::read_many`].
#[derive(Debug)]
pub struct ReadMany<'a> {
    decoder: &'a mut Decoder,
}

impl Iterator for ReadMany<'_> {
    type Item = Result<Message, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.decoder.read_one() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use milter_types::message::response::Response;

    use super::*;
    use crate::codec::Encode;

    #[test]
    fn read_one_needs_more_on_empty_buffer() {
        let mut decoder = Decoder::with_default_limit();
        assert_eq!(decoder.read_one(), Ok(None));
    }

    #[test]
    fn chunked_feed_is_equivalent_to_feeding_all_at_once(){
        let message = Message::Response(Response::Continue);
        let bytes = message.encode();

        // Feed the whole thing at once.
        let mut whole = Decoder::with_default_limit();
        whole.feed(&bytes);
        let from_whole: Vec<_> = whole.read_many().collect::<Result<_, _>>().unwrap();

        // Feed it one byte at a time (§8 property 3).
        let mut chunked = Decoder::with_default_limit();
        let mut from_chunked = Vec::new();
        for byte in &bytes {
            chunked.feed(std::slice::from_ref(byte));
            from_chunked.extend(chunked.read_many().collect::<Result<Vec<_>, _>>().unwrap());
        }

        assert_eq!(from_whole, from_chunked);
        assert_eq!(from_whole, vec![message]);
    }

    #[test]
    fn unknown_tag_decodes_to_misc_and_stream_continues() {
        let mut decoder = Decoder::with_default_limit();
        let mut frame = Vec::new();
        wire::write_frame(0xFF, b"whatever", &mut frame);
        decoder.feed(&frame);

        let message = Message::Response(Response::Continue);
        decoder.feed(&message.encode());

        let decoded: Vec<_> = decoder.read_many().collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(matches!(decoded[0], Message::Misc(_)));
        assert_eq!(decoded[1], message);
    }

    #[test]
    fn oversized_frame_is_rejected_without_buffering_payload() {
        let mut decoder = Decoder::new(8);
        let mut frame = Vec::new();
        frame.extend_from_slice(&100u32.to_be_bytes());
        frame.push(b'c');
        decoder.feed(&frame);
        assert!(matches!(
            decoder.read_one(),
            Err(FramingError::FrameTooLarge { size: 100, max: 8 })
        ));
    }
}
