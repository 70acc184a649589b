//! Chain families.
//!
//! # Responsibilities
//! - Map a side chain to the router id the relay chain verifies it with
//! - Produce the extra-info payload attached to side-chain registration
//! - Choose where a side chain's genesis header comes from
//!
//! # Design Decisions
//! - Closed enum: adding a family is a change in `ChainFamily::of` only
//! - Lookup returns `None` for unsupported chains; callers decide severity

use alloy::primitives::Bytes;
use serde::Serialize;

use crate::routing::chain::ChainId;

/// Blocks per validator epoch on BSC.
pub const BSC_EPOCH_LENGTH: u64 = 200;

/// Extra registration info understood by the BSC header-sync router.
#[derive(Debug, Serialize)]
struct BscExtraInfo {
    #[serde(rename = "ChainID")]
    chain_id: u64,
}

/// Where the genesis header of a side chain is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenesisSource {
    /// Current head of the chain.
    Latest,
    /// Most recent block whose height is a multiple of the epoch length.
    EpochBoundary { epoch_length: u64 },
    /// Operator-supplied epoch height.
    OperatorEpoch,
}

/// Verification family of a side chain on the relay chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// Plain EVM header verification.
    StandardEvm { router: u64 },
    /// EVM verification that needs the chain id as extra info.
    ExtraInfoEvm { router: u64 },
    /// Tendermint-style chains reached through an EVM endpoint.
    OkexChainLike { router: u64 },
}

impl ChainFamily {
    /// Family of a side chain, `None` when the relay chain has no router for it.
    pub fn of(chain: ChainId) -> Option<Self> {
        match chain {
            ChainId::ETHEREUM => Some(ChainFamily::StandardEvm { router: 2 }),
            ChainId::HECO => Some(ChainFamily::StandardEvm { router: 7 }),
            ChainId::BSC => Some(ChainFamily::ExtraInfoEvm { router: 6 }),
            ChainId::OKEX => Some(ChainFamily::OkexChainLike { router: 12 }),
            _ => None,
        }
    }

    pub fn router(&self) -> u64 {
        match *self {
            ChainFamily::StandardEvm { router }
            | ChainFamily::ExtraInfoEvm { router }
            | ChainFamily::OkexChainLike { router } => router,
        }
    }

    /// Registration extra info; empty for families that need none.
    pub fn extra_info(&self, chain: ChainId) -> Result<Bytes, serde_json::Error> {
        match self {
            ChainFamily::ExtraInfoEvm { .. } => {
                let encoded = serde_json::to_vec(&BscExtraInfo { chain_id: chain.0 })?;
                Ok(Bytes::from(encoded))
            }
            ChainFamily::StandardEvm { .. } | ChainFamily::OkexChainLike { .. } => {
                Ok(Bytes::new())
            }
        }
    }

    pub fn genesis_source(&self) -> GenesisSource {
        match self {
            ChainFamily::StandardEvm { .. } => GenesisSource::Latest,
            ChainFamily::ExtraInfoEvm { .. } => GenesisSource::EpochBoundary {
                epoch_length: BSC_EPOCH_LENGTH,
            },
            ChainFamily::OkexChainLike { .. } => GenesisSource::OperatorEpoch,
        }
    }
}

impl GenesisSource {
    /// Header height to use given the chain head and the `--epoch` flag.
    ///
    /// Returns `None` when the operator epoch is required but was not given.
    pub fn height(&self, head: u64, operator_epoch: u64) -> Option<u64> {
        match *self {
            GenesisSource::Latest => Some(head),
            GenesisSource::EpochBoundary { epoch_length } => {
                Some(head - head % epoch_length.max(1))
            }
            GenesisSource::OperatorEpoch => (operator_epoch > 0).then_some(operator_epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_lookup() {
        assert_eq!(ChainFamily::of(ChainId::ETHEREUM).map(|f| f.router()), Some(2));
        assert_eq!(ChainFamily::of(ChainId::HECO).map(|f| f.router()), Some(7));
        assert_eq!(ChainFamily::of(ChainId::BSC).map(|f| f.router()), Some(6));
        assert_eq!(ChainFamily::of(ChainId::OKEX).map(|f| f.router()), Some(12));
        assert!(ChainFamily::of(ChainId::NEO).is_none());
        assert!(ChainFamily::of(ChainId::POLY).is_none());
    }

    #[test]
    fn test_bsc_extra_info() {
        let family = ChainFamily::of(ChainId::BSC).unwrap();
        let extra = family.extra_info(ChainId::BSC).unwrap();
        assert_eq!(extra.as_ref(), br#"{"ChainID":6}"#);
    }

    #[test]
    fn test_no_extra_info_for_standard_evm() {
        let family = ChainFamily::of(ChainId::ETHEREUM).unwrap();
        assert!(family.extra_info(ChainId::ETHEREUM).unwrap().is_empty());
        let family = ChainFamily::of(ChainId::OKEX).unwrap();
        assert!(family.extra_info(ChainId::OKEX).unwrap().is_empty());
    }

    #[test]
    fn test_genesis_heights() {
        assert_eq!(GenesisSource::Latest.height(1234, 0), Some(1234));
        let bsc = ChainFamily::of(ChainId::BSC).unwrap().genesis_source();
        assert_eq!(bsc.height(1234, 0), Some(1200));
        assert_eq!(bsc.height(1400, 0), Some(1400));
        assert_eq!(GenesisSource::OperatorEpoch.height(1234, 0), None);
        assert_eq!(GenesisSource::OperatorEpoch.height(1234, 77), Some(77));
    }
}
