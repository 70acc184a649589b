//! Shared utilities for integration testing: a scripted chain and an instant clock.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::consensus::TxEnvelope;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use bridge_admin::blockchain::types::{BlockHeader, BlockchainError, BlockchainResult, ReceiptSummary};
use bridge_admin::blockchain::{AdminKey, ChainRpc, Clock};
use bridge_admin::config::{BridgeConfig, ChainConfig};
use bridge_admin::routing::ChainId;

/// Anvil's first dev account.
pub const ADMIN_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Anvil's second and third dev accounts, used as relay validators.
pub const VALIDATOR_PRIVATE_KEYS: [&str; 2] = [
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub fn admin_key() -> AdminKey {
    AdminKey::from_private_key(ADMIN_PRIVATE_KEY).unwrap()
}

pub fn validator_keys() -> Vec<AdminKey> {
    VALIDATOR_PRIVATE_KEYS
        .iter()
        .map(|k| AdminKey::from_private_key(k).unwrap())
        .collect()
}

/// Config with every side chain present and bytecode under `dir/contracts`.
pub fn test_config(dir: &Path) -> BridgeConfig {
    let contracts = dir.join("contracts");
    std::fs::create_dir_all(&contracts).unwrap();
    std::fs::write(contracts.join("eccd.bin"), "0x6080604052").unwrap();
    std::fs::write(contracts.join("eccm.bin"), "0x6080604053").unwrap();
    std::fs::write(contracts.join("ccmp.bin"), "0x6080604054").unwrap();

    BridgeConfig {
        level_db: dir.join("leveldb"),
        keystore: dir.join("keystore"),
        admin_account_list: vec![admin_key().address()],
        contract_dir: contracts,
        ethereum: Some(ChainConfig::new(ChainId::ETHEREUM, "eth", "http://127.0.0.1:8545")),
        bsc: Some(ChainConfig::new(ChainId::BSC, "bsc", "http://127.0.0.1:8546")),
        heco: Some(ChainConfig::new(ChainId::HECO, "heco", "http://127.0.0.1:8547")),
        ok: Some(ChainConfig::new(ChainId::OKEX, "ok", "http://127.0.0.1:8548")),
        ..Default::default()
    }
}

/// Clock that returns immediately and counts how often it was asked to sleep.
#[derive(Default)]
pub struct InstantClock {
    sleeps: AtomicU32,
}

impl InstantClock {
    pub fn sleeps(&self) -> u32 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clock for InstantClock {
    async fn sleep(&self, _duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}

/// Everything the chain has seen so far.
#[derive(Default)]
pub struct MockState {
    pub sent: Vec<Bytes>,
    pub status_queries: HashMap<TxHash, u32>,
    pub calls: Vec<TransactionRequest>,
}

/// A programmable chain: fixed nonce and gas price, a configurable number of
/// pending ticks per transaction, and a canned receipt.
pub struct MockChain {
    pub chain_id: Option<u64>,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_estimate: u64,
    /// Status queries answered "pending" before a transaction is mined.
    pub pending_ticks: u32,
    pub always_pending: bool,
    pub receipt_success: bool,
    pub contract_address: Option<Address>,
    pub call_result: Bytes,
    pub balance: U256,
    pub head: u64,
    pub fail_nonce: bool,
    /// Status queries per transaction that fail before the node answers.
    pub fail_status_ticks: u32,
    pub fail_gas_price: bool,
    pub fail_estimate: bool,
    /// Reject broadcasts after recording them.
    pub fail_send: bool,
    pub state: Mutex<MockState>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            chain_id: Some(31337),
            nonce: 0,
            gas_price: 1_000_000_000,
            gas_estimate: 21_000,
            pending_ticks: 0,
            always_pending: false,
            receipt_success: true,
            contract_address: None,
            call_result: Bytes::new(),
            balance: U256::ZERO,
            head: 1_000,
            fail_nonce: false,
            fail_status_ticks: 0,
            fail_gas_price: false,
            fail_estimate: false,
            fail_send: false,
            state: Mutex::new(MockState::default()),
        }
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw transactions broadcast so far.
    pub fn sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Broadcast transactions, decoded.
    pub fn sent_envelopes(&self) -> Vec<TxEnvelope> {
        self.sent()
            .iter()
            .map(|raw| TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap())
            .collect()
    }

    /// Total pending-status queries across all transactions.
    pub fn status_queries(&self) -> u32 {
        self.state.lock().unwrap().status_queries.values().sum()
    }

    /// Read-only calls made so far.
    pub fn calls(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    fn evm_chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    async fn pending_nonce(&self, _address: Address) -> BlockchainResult<u64> {
        if self.fail_nonce {
            return Err(BlockchainError::Rpc("connection refused".into()));
        }
        Ok(self.nonce)
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        if self.fail_gas_price {
            return Err(BlockchainError::Rpc("eth_gasPrice: busy".into()));
        }
        Ok(self.gas_price)
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> BlockchainResult<u64> {
        if self.fail_estimate {
            return Err(BlockchainError::Rpc("execution reverted".into()));
        }
        Ok(self.gas_estimate)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let hash = keccak256(&raw);
        self.state.lock().unwrap().sent.push(raw);
        if self.fail_send {
            return Err(BlockchainError::Rpc("nonce too low".into()));
        }
        Ok(hash)
    }

    async fn is_pending(&self, tx_hash: TxHash) -> BlockchainResult<bool> {
        let mut state = self.state.lock().unwrap();
        let count = state.status_queries.entry(tx_hash).or_insert(0);
        *count += 1;
        if *count <= self.fail_status_ticks {
            return Err(BlockchainError::Rpc("connection reset".into()));
        }
        let answered = *count - self.fail_status_ticks;
        Ok(self.always_pending || answered <= self.pending_ticks)
    }

    async fn receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<ReceiptSummary>> {
        Ok(Some(ReceiptSummary {
            tx_hash,
            success: self.receipt_success,
            block_number: Some(self.head),
            contract_address: self.contract_address,
            logs: Vec::new(),
        }))
    }

    async fn call(&self, tx: TransactionRequest) -> BlockchainResult<Bytes> {
        self.state.lock().unwrap().calls.push(tx);
        Ok(self.call_result.clone())
    }

    async fn balance(&self, _address: Address) -> BlockchainResult<U256> {
        Ok(self.balance)
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        Ok(self.head)
    }

    async fn block_header(&self, number: u64) -> BlockchainResult<BlockHeader> {
        Ok(BlockHeader {
            number,
            hash: B256::from(U256::from(number)),
            json: Bytes::from(format!("{{\"number\":\"{:#x}\"}}", number).into_bytes()),
            rlp: Bytes::from(vec![0xc1, 0x80]),
        })
    }
}
