//! Cross-chain identifiers.
//!
//! Identifiers are the relay chain's numbering, not EVM chain ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relay-chain identifier of a chain participating in the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const POLY: ChainId = ChainId(0);
    pub const ETHEREUM: ChainId = ChainId(2);
    pub const ONTOLOGY: ChainId = ChainId(3);
    pub const NEO: ChainId = ChainId(4);
    pub const BSC: ChainId = ChainId(6);
    pub const HECO: ChainId = ChainId(7);
    pub const OKEX: ChainId = ChainId(12);
    pub const O3: ChainId = ChainId(82);

    /// Every identifier known to the tool, in display order.
    pub const KNOWN: [ChainId; 8] = [
        ChainId::POLY,
        ChainId::ETHEREUM,
        ChainId::ONTOLOGY,
        ChainId::NEO,
        ChainId::BSC,
        ChainId::HECO,
        ChainId::OKEX,
        ChainId::O3,
    ];

    /// Side chains that carry an EVM deployment in the configuration file.
    pub const SIDE_CHAINS: [ChainId; 4] =
        [ChainId::ETHEREUM, ChainId::BSC, ChainId::HECO, ChainId::OKEX];

    /// Short lowercase name, `None` for identifiers outside the known set.
    pub fn name(self) -> Option<&'static str> {
        match self {
            ChainId::POLY => Some("poly"),
            ChainId::ETHEREUM => Some("eth"),
            ChainId::ONTOLOGY => Some("ont"),
            ChainId::NEO => Some("neo"),
            ChainId::BSC => Some("bsc"),
            ChainId::HECO => Some("heco"),
            ChainId::OKEX => Some("ok"),
            ChainId::O3 => Some("o3"),
            _ => None,
        }
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
