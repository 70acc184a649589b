//! The JSON-RPC surface the transaction engine depends on.
//!
//! `BlockchainClient` implements it over HTTP; tests substitute a scripted
//! chain so nonce, gas price and confirmation ticks are deterministic.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::{BlockHeader, BlockchainResult, ReceiptSummary};

/// Chain queries and submissions used by the builder, submitter and poller.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// EVM chain id for replay-protected signing, if the node reported one.
    fn evm_chain_id(&self) -> Option<u64>;

    /// Nonce of `address` including its pending transactions.
    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Node-suggested gas price in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Gas estimate for a concrete transaction.
    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64>;

    /// Broadcast a signed, EIP-2718 encoded transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;

    /// Whether the transaction is known but not yet included in a block.
    async fn is_pending(&self, tx_hash: TxHash) -> BlockchainResult<bool>;

    async fn receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>>;

    /// Read-only contract call against the latest block.
    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes>;

    async fn balance(&self, address: Address) -> BlockchainResult<U256>;

    async fn block_number(&self) -> BlockchainResult<u64>;

    async fn block_header(&self, number: u64) -> BlockchainResult<BlockHeader>;
}
