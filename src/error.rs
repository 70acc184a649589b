//! Errors surfaced to the command dispatcher.

use std::path::PathBuf;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::{ConfigError, ContractRole};
use crate::routing::ChainId;

/// Errors produced by bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// A chain operation failed before reaching the chain.
    #[error("{action} failed, err: {source}")]
    Operation {
        action: String,
        #[source]
        source: BlockchainError,
    },

    /// A prerequisite contract has no address in the config.
    #[error("{role} is not deployed on chain {chain}, run its deploy command first")]
    MissingContract { chain: ChainId, role: ContractRole },

    /// The transaction was mined but reverted.
    #[error("{action} on chain {chain} reverted, txhash {tx_hash}")]
    Reverted {
        chain: ChainId,
        action: String,
        tx_hash: TxHash,
    },

    /// The chain has no relay-chain family (registration, header sync).
    #[error("chain id {0} invalid")]
    UnsupportedChain(ChainId),

    #[error("no relay validators loaded from {0}")]
    NoValidators(PathBuf),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encode {what}: {reason}")]
    Encode { what: &'static str, reason: String },

    #[error("{0}")]
    Usage(String),
}

impl BridgeError {
    /// Wrap a chain error with the operation it interrupted.
    pub fn operation(action: impl Into<String>) -> impl FnOnce(BlockchainError) -> BridgeError {
        let action = action.into();
        move |source| BridgeError::Operation { action, source }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
