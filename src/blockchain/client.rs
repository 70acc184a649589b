//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint
//! - Query chain state (nonce, gas price, balances, receipts, headers)
//! - Broadcast signed transactions
//! - Bound every request with a timeout

use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{
    BlockHeader, BlockchainError, BlockchainResult, LogSummary, ReceiptSummary,
};

/// Default RPC request timeout in seconds.
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    chain_id: Option<u64>,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Connect to `rpc_url` and read the node's chain id.
    ///
    /// An unreachable node does not fail construction; the first real query
    /// reports the error instead.
    pub async fn connect(rpc_url: &str, rpc_timeout_secs: u64) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(url))
            as Arc<dyn Provider + Send + Sync>;

        let mut client = Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id: None,
            timeout_duration: Duration::from_secs(rpc_timeout_secs),
        };

        match client.request("eth_chainId", client.provider.get_chain_id()).await {
            Ok(chain_id) => {
                client.chain_id = Some(chain_id);
                tracing::info!(rpc_url = %rpc_url, chain_id, "Blockchain client initialized");
            }
            Err(e) => {
                tracing::warn!(
                    rpc_url = %rpc_url,
                    error = %e,
                    "Blockchain client initialized but chain id query failed"
                );
            }
        }

        Ok(client)
    }

    async fn request<F, T, E>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("{}: {}", method, e))),
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

#[async_trait]
impl ChainRpc for BlockchainClient {
    fn evm_chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    async fn pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.request(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.request("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        self.request("eth_estimateGas", self.provider.estimate_gas(tx)).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let pending = self
            .request(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn is_pending(&self, tx_hash: TxHash) -> BlockchainResult<bool> {
        let tx = self
            .request(
                "eth_getTransactionByHash",
                self.provider.get_transaction_by_hash(tx_hash),
            )
            .await?
            .ok_or_else(|| BlockchainError::NotFound(format!("transaction {}", tx_hash)))?;
        Ok(tx.block_number.is_none())
    }

    async fn receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        let receipt = self
            .request(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;

        Ok(receipt.map(|r| ReceiptSummary {
            tx_hash: r.transaction_hash,
            success: r.status(),
            block_number: r.block_number,
            contract_address: r.contract_address,
            logs: r
                .inner
                .logs()
                .iter()
                .map(|log| LogSummary {
                    address: log.address(),
                    data: log.data().data.clone(),
                    topics: log.topics().to_vec(),
                })
                .collect(),
        }))
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.request("eth_call", self.provider.call(tx)).await
    }

    async fn balance(&self, address: Address) -> BlockchainResult<U256> {
        self.request("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.request("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn block_header(&self, number: u64) -> BlockchainResult<BlockHeader> {
        let block = self
            .request(
                "eth_getBlockByNumber",
                self.provider
                    .get_block_by_number(BlockNumberOrTag::Number(number)),
            )
            .await?
            .ok_or_else(|| BlockchainError::NotFound(format!("block {}", number)))?;

        let header = block.header;
        let json = serde_json::to_vec(&header)
            .map_err(|e| BlockchainError::Rpc(format!("encode header {}: {}", number, e)))?;
        let rlp = alloy_rlp::encode(&header.inner);

        Ok(BlockHeader {
            number: header.inner.number,
            hash: header.hash,
            json: json.into(),
            rlp: rlp.into(),
        })
    }
}

impl fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
