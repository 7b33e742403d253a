//! Setup messages: `Negotiate` and `Macro` (§4.1, §4.6).

use crate::{
    error::ValidationError,
    flags::{ActionFlags, ProtocolFlags},
    macros::MacroStage,
};

/// One record of a `Negotiate` macro table: the symbols the filter (or MTA) wants available at
/// a given stage, e.g. `{j}` and `{daemon_name}` at `Connect`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroRequest {
    pub stage: MacroStage,
    pub symbols: Vec<String>,
}

impl MacroRequest {
    pub fn new(stage: MacroStage, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            stage,
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

/// `O` — negotiation (§4.1, §4.6).
///
/// Exchanged once per session, in both directions: the MTA offers `version`/`actions`/
/// `protocol`, the filter replies with the *accepted* (intersected) values, which then become
/// immutable for the rest of the session.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Negotiate {
    pub version: u32,
    pub actions: ActionFlags,
    pub protocol: ProtocolFlags,
    pub macros: Vec<MacroRequest>,
}

impl Negotiate {
    pub fn new(
        version: u32,
        actions: ActionFlags,
        protocol: ProtocolFlags,
        macros: Vec<MacroRequest>,
    ) -> Self {
        Self {
            version,
            actions,
            protocol,
            macros,
        }
    }

    /// Computes the session parameters the MTA's offer and the filter's desire agree on
    /// (§4.6): the intersection of both flag sets and the minimum of both versions.
    pub fn intersect(mta_offer: &Negotiate, filter_desire: &Negotiate) -> Negotiate {
        Negotiate {
            version: mta_offer.version.min(filter_desire.version),
            actions: mta_offer.actions.intersection(filter_desire.actions),
            protocol: mta_offer.protocol.intersection(filter_desire.protocol),
            macros: filter_desire.macros.clone(),
        }
    }
}

/// `D` — a macro value set attached to the next event at `stage` (§4.1, §4.2).
///
/// `values` holds `(name, value)` pairs; the wire form is a flat, even-length string table that
/// the codec folds into pairs and fails to decode with an odd count (§4.2).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Macro {
    pub stage: MacroStage,
    pub values: Vec<(String, String)>,
}

impl Macro {
    pub fn new(stage: MacroStage, values: Vec<(String, String)>) -> Result<Self, ValidationError> {
        for (name, value) in &values {
            crate::error::check_no_nul(name)?;
            crate::error::check_no_nul(value)?;
        }
        Ok(Self { stage, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_picks_minimum_version() {
        let mta = Negotiate::new(6, ActionFlags::ADD_HEADERS, ProtocolFlags::NONE, vec![]);
        let filter = Negotiate::new(2, ActionFlags::ADD_HEADERS, ProtocolFlags::NONE, vec![]);
        let agreed = Negotiate::intersect(&mta, &filter);
        assert_eq!(agreed.version, 2);
    }

    #[test]
    fn macro_rejects_odd_looking_embedded_nul() {
        assert!(Macro::new(MacroStage::Connect, vec![("j\0".into(), "x".into())]).is_err());
    }
}
