//! Reserved/undocumented tags (§3, §9).
//!
//! `Shutdown` (`4`), `ConnectionFail` (`f`), and `SetSymbolList` (`l`) have no documented payload
//! shape. Rather than guessing one, the codec preserves the raw frame so a caller that does
//! understand a particular MTA's use of these tags can still get at the bytes; the session state
//! machine rejects them as [`UnexpectedMessage`](crate) unless explicitly allowed.

/// A message whose tag is reserved, undocumented, or simply unrecognised.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Misc {
    pub tag: u8,
    pub payload: Vec<u8>,
}

impl Misc {
    pub fn new(tag: u8, payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_raw_bytes() {
        let misc = Misc::new(0xFF, vec![1, 2, 3]);
        assert_eq!(misc.payload, vec![1, 2, 3]);
    }
}
