//! Wire primitives (§4.1): frame length-prefixing and the small set of payload shapes every
//! message type is built out of (big-endian integers, null-terminated strings, string tables,
//! raw tail bytes).

use nom::{
    bytes::complete::{tag, take, take_till},
    combinator::map,
    multi::many0,
    number::complete::{be_u16, be_u32, be_u8},
    sequence::terminated,
};

use crate::{
    decode::{MilterErrorKind, MilterParseError, MilterResult},
    error::FramingError,
};

/// Default upper bound on a frame's payload size (§4.1): `2^20` bytes.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 1 << 20;

/// Result of splitting one frame off the front of a byte buffer.
pub struct Frame<'a> {
    pub tag: u8,
    pub payload: &'a [u8],
    /// Total bytes consumed from the buffer, i.e. `4 + size`.
    pub consumed: usize,
}

/// Splits the next complete frame off the front of `buf` (§4.1).
///
/// Returns `Ok(None)` if fewer than `4 + size` bytes are buffered ("NeedMore" in spec terms);
/// the caller should retry after feeding more bytes. Returns `Err` if the declared `size` is `0`
/// or exceeds `max_frame_size` — checked *before* any payload bytes are sliced out, so a hostile
/// peer cannot force an allocation sized by an attacker-controlled, unvalidated length.
pub fn read_frame(buf: &[u8], max_frame_size: u32) -> Result<Option<Frame<'_>>, FramingError> {
    if buf.len() < 4 {
        return Ok(None);
    }

    let size = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);

    if size == 0 {
        return Err(FramingError::EmptyFrame);
    }
    if size > max_frame_size {
        return Err(FramingError::FrameTooLarge {
            size,
            max: max_frame_size,
        });
    }

    let total = 4 + size as usize;
    if buf.len() < total {
        return Ok(None);
    }

    let tag = buf[4];
    let payload = &buf[5..total];

    Ok(Some(Frame {
        tag,
        payload,
        consumed: total,
    }))
}

/// Encodes `tag ‖ payload` as a complete `u32 size ‖ u8 tag ‖ payload` frame (§4.1).
///
/// `payload.len() + 1` (the `+1` accounts for the tag byte) must fit in a `u32`; this can only
/// fail for a payload close to 4 GiB, which no milter message legitimately produces.
pub fn write_frame(tag: u8, payload: &[u8], out: &mut Vec<u8>) {
    let size = u32::try_from(payload.len() + 1).expect("payload too large to frame");
    out.extend_from_slice(&size.to_be_bytes());
    out.push(tag);
    out.extend_from_slice(payload);
}

// ----- payload-level writers (mirror the parsers below, §4.2) -----

/// Appends `s` followed by a null terminator (§3, §4.1).
pub(crate) fn push_cstring(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

/// Appends `value` as big-endian `u16`.
pub(crate) fn push_u16_be(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Appends `value` as big-endian `u32`.
pub(crate) fn push_u32_be(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

// ----- payload-level parsers (operate on a single frame's payload slice) -----

/// A single byte, e.g. a family tag or macro stage byte.
pub(crate) fn byte(input: &[u8]) -> MilterResult<&[u8], u8> {
    be_u8(input)
}

/// `u16`, big-endian.
pub(crate) fn u16_be(input: &[u8]) -> MilterResult<&[u8], u16> {
    be_u16(input)
}

/// `u32`, big-endian.
pub(crate) fn u32_be(input: &[u8]) -> MilterResult<&[u8], u32> {
    be_u32(input)
}

/// A single null-terminated string (§3, §4.1). Fails if no terminator is found before the end
/// of the payload.
pub(crate) fn cstring(input: &[u8]) -> MilterResult<&[u8], String> {
    let (rest, bytes): (&[u8], &[u8]) =
        terminated(take_till(|b| b == 0), tag::<_, _, MilterParseError<&[u8]>>(&b"\0"[..]))(input)
            .map_err(|e| {
                e.map(|_| MilterParseError {
                    input,
                    kind: MilterErrorKind::MissingTerminator,
                })
            })?;

    let s = String::from_utf8(bytes.to_vec()).map_err(|_| {
        nom::Err::Failure(MilterParseError {
            input,
            kind: MilterErrorKind::InvalidUtf8,
        })
    })?;

    Ok((rest, s))
}

/// Zero or more null-terminated strings, consuming to the end of the payload (§4.1).
pub(crate) fn string_table(input: &[u8]) -> MilterResult<&[u8], Vec<String>> {
    many0(cstring)(input)
}

/// The remainder of the payload as raw, unterminated bytes: used by `Body`, `EndOfMessage`, and
/// `ReplaceBody`, whose length is implicit in the frame size rather than a terminator (§4.1).
pub(crate) fn raw_tail(input: &[u8]) -> MilterResult<&[u8], Vec<u8>> {
    map(take(input.len()), |bytes: &[u8]| bytes.to_vec())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_frame_needs_more_on_short_buffer() {
        assert!(matches!(read_frame(&[0, 0, 0], DEFAULT_MAX_FRAME_SIZE), Ok(None)));
        assert!(matches!(
            read_frame(&[0, 0, 0, 2, b'c'], DEFAULT_MAX_FRAME_SIZE),
            Ok(None)
        ));
    }

    #[test]
    fn read_frame_splits_exact_frame() {
        let buf = [0, 0, 0, 1, b'c', 0xAA];
        let frame = read_frame(&buf, DEFAULT_MAX_FRAME_SIZE).unwrap().unwrap();
        assert_eq!(frame.tag, b'c');
        assert!(frame.payload.is_empty());
        assert_eq!(frame.consumed, 5);
    }

    #[test]
    fn read_frame_rejects_empty_size() {
        assert!(matches!(
            read_frame(&[0, 0, 0, 0], DEFAULT_MAX_FRAME_SIZE),
            Err(FramingError::EmptyFrame)
        ));
    }

    #[test]
    fn read_frame_rejects_oversized_without_buffering_payload() {
        let mut buf = vec![0u8, 0, 0, 0];
        buf[0..4].copy_from_slice(&(1u32 << 31).to_be_bytes());
        assert!(matches!(
            read_frame(&buf, DEFAULT_MAX_FRAME_SIZE),
            Err(FramingError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn write_frame_round_trips_with_read_frame() {
        let mut out = Vec::new();
        write_frame(b'c', b"hello", &mut out);
        let frame = read_frame(&out, DEFAULT_MAX_FRAME_SIZE).unwrap().unwrap();
        assert_eq!(frame.tag, b'c');
        assert_eq!(frame.payload, b"hello");
        assert_eq!(frame.consumed, out.len());
    }

    #[test]
    fn cstring_consumes_up_to_terminator() {
        let (rem, s) = cstring(b"abc\0xyz").unwrap();
        assert_eq!(s, "abc");
        assert_eq!(rem, b"xyz");
    }

    #[test]
    fn cstring_without_terminator_is_an_error() {
        assert!(cstring(b"abc").is_err());
    }

    #[test]
    fn string_table_splits_even_on_empty_strings() {
        let (rem, table) = string_table(b"a\0\0b\0").unwrap();
        assert_eq!(table, vec!["a".to_string(), "".to_string(), "b".to_string()]);
        assert!(rem.is_empty());
    }
}
