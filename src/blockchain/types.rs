//! Chain-facing types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, B256};
use thiserror::Error;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Account nonce could not be read.
    #[error("nonce query for {address} failed: {reason}")]
    NonceQuery { address: Address, reason: String },

    /// Suggested gas price could not be read.
    #[error("gas price query failed: {0}")]
    GasPriceQuery(String),

    /// Gas estimation for a transfer failed.
    #[error("gas estimate for transfer to {to} failed: {reason}")]
    GasEstimate { to: Address, reason: String },

    /// Signing the transaction failed.
    #[error("sign transaction failed: {0}")]
    Signing(String),

    /// The node refused the signed transaction.
    #[error("send transaction from {from} with nonce {nonce} failed: {reason}")]
    Submit {
        from: Address,
        nonce: u64,
        reason: String,
    },

    /// Invalid private key, keystore file or passphrase.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A requested block or transaction does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Final state of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// Mined with a successful receipt.
    Confirmed { block_number: u64 },
    /// Mined but reverted.
    FailedOnChain { block_number: Option<u64> },
    /// Still pending when the poll window closed, or the receipt could not
    /// be read. Treated as a soft success: the operator verifies externally.
    TimedOutUnknown,
}

/// Result of submitting one transaction and waiting for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub tx_hash: TxHash,
    pub status: TxStatus,
    pub from: Address,
    pub nonce: u64,
    /// Address of the contract created by a deployment.
    pub contract_address: Option<Address>,
}

/// Event log as dumped for operator diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSummary {
    pub address: Address,
    pub data: Bytes,
    pub topics: Vec<B256>,
}

/// The parts of a transaction receipt the tool acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub tx_hash: TxHash,
    pub success: bool,
    pub block_number: Option<u64>,
    pub contract_address: Option<Address>,
    pub logs: Vec<LogSummary>,
}

/// A block header in the two encodings consumed by header sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub hash: B256,
    /// Geth-compatible JSON encoding.
    pub json: Bytes,
    /// RLP encoding of the consensus header.
    pub rlp: Bytes,
}
