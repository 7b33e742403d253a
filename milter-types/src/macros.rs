//! Macro stage types.

/// The 7 macro-bearing stages a `Macro` message can attach symbols to (§3).
///
/// The standalone `Macro` message (`D`, §6) tags its stage with a single `u8`; `Negotiate`'s
/// macro table (§4.2) tags each record with a `u32` instead. Both wire forms share this one
/// Rust type: [`MacroStage::to_byte`]/[`MacroStage::from_byte`] for the former, and
/// [`MacroStage::to_wire_u32`]/[`MacroStage::from_wire_u32`] (the same tag, zero-extended to 4
/// bytes) for the latter. Unrecognised values decode to [`MacroStage::Other`] so a newer MTA's
/// stage extensions do not turn into a framing error.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroStage {
    Connect,
    Helo,
    EnvelopeFrom,
    EnvelopeRecipient,
    Data,
    EndOfMessage,
    EndOfHeaders,
    /// A stage byte not in the table above, preserved verbatim.
    Other(u8),
}

impl MacroStage {
    pub const fn to_byte(self) -> u8 {
        match self {
            MacroStage::Connect => b'C',
            MacroStage::Helo => b'H',
            MacroStage::EnvelopeFrom => b'M',
            MacroStage::EnvelopeRecipient => b'R',
            MacroStage::Data => b'T',
            MacroStage::EndOfMessage => b'E',
            MacroStage::EndOfHeaders => b'N',
            MacroStage::Other(byte) => byte,
        }
    }

    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'C' => MacroStage::Connect,
            b'H' => MacroStage::Helo,
            b'M' => MacroStage::EnvelopeFrom,
            b'R' => MacroStage::EnvelopeRecipient,
            b'T' => MacroStage::Data,
            b'E' => MacroStage::EndOfMessage,
            b'N' => MacroStage::EndOfHeaders,
            other => MacroStage::Other(other),
        }
    }

    /// The 4-byte wire form `Negotiate`'s macro table uses for each stage record (§4.2),
    /// the same stage tag as [`MacroStage::to_byte`] zero-extended into a `u32`.
    pub const fn to_wire_u32(self) -> u32 {
        self.to_byte() as u32
    }

    /// Inverse of [`MacroStage::to_wire_u32`]. Values above `u8::MAX` have no byte-tag
    /// equivalent and decode to [`MacroStage::Other`] with their low byte, the same
    /// tolerant fallback [`MacroStage::from_byte`] uses for an unrecognised tag.
    pub const fn from_wire_u32(value: u32) -> Self {
        Self::from_byte(value as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stages_round_trip() {
        for stage in [
            MacroStage::Connect,
            MacroStage::Helo,
            MacroStage::EnvelopeFrom,
            MacroStage::EnvelopeRecipient,
            MacroStage::Data,
            MacroStage::EndOfMessage,
            MacroStage::EndOfHeaders,
        ] {
            assert_eq!(MacroStage::from_byte(stage.to_byte()), stage);
        }
    }

    #[test]
    fn unrecognised_stage_is_preserved() {
        assert_eq!(MacroStage::from_byte(b'?'), MacroStage::Other(b'?'));
        assert_eq!(MacroStage::Other(b'?').to_byte(), b'?');
    }
}
