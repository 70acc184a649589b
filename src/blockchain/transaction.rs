//! Transaction building and signing.
//!
//! # Responsibilities
//! - Resolve the sender's pending nonce and the gas price
//! - Apply the operator's gas-price floor
//! - Estimate gas for plain transfers
//! - Assemble and sign transaction intents

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, Address, Bytes, TxHash, TxKind, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::AdminKey;

/// Gas limit for contract deployments.
pub const DEFAULT_DEPLOY_GAS_LIMIT: u64 = 5_000_000;

/// Gas limit for ordinary contract calls.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Wei per gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Nonce and pricing resolved for one sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub from: Address,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: Option<u64>,
}

impl AuthContext {
    /// Intent for a contract call.
    pub fn call(&self, to: Address, input: Bytes) -> TransactionIntent {
        self.intent(TxKind::Call(to), input)
    }

    /// Intent for a contract creation.
    pub fn deploy(&self, init_code: Bytes) -> TransactionIntent {
        self.intent(TxKind::Create, init_code)
    }

    /// Intent for a plain value transfer.
    pub fn transfer(&self, to: Address) -> TransactionIntent {
        self.intent(TxKind::Call(to), Bytes::new())
    }

    fn intent(&self, to: TxKind, input: Bytes) -> TransactionIntent {
        TransactionIntent {
            from: self.from,
            to,
            value: self.value,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            nonce: self.nonce,
            chain_id: self.chain_id,
            input,
        }
    }
}

/// A fully specified, unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    pub from: Address,
    pub to: TxKind,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: Option<u64>,
    pub input: Bytes,
}

impl TransactionIntent {
    pub fn into_request(self) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_from(self.from)
            .with_kind(self.to)
            .with_value(self.value)
            .with_input(self.input)
            .with_nonce(self.nonce)
            .with_gas_price(self.gas_price)
            .with_gas_limit(self.gas_limit);
        if let Some(chain_id) = self.chain_id {
            tx.set_chain_id(chain_id);
        }
        tx
    }

    /// Sign as a legacy transaction with `key`.
    pub async fn sign(self, key: &AdminKey) -> BlockchainResult<SignedTransaction> {
        if key.address() != self.from {
            return Err(BlockchainError::Signing(format!(
                "intent sender {} does not match signing key {}",
                self.from,
                key.address()
            )));
        }
        let (from, nonce, to) = (self.from, self.nonce, self.to);
        let envelope = self
            .into_request()
            .build(&key.wallet())
            .await
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;
        let raw: Bytes = envelope.encoded_2718().into();

        Ok(SignedTransaction {
            hash: keccak256(&raw),
            raw,
            from,
            nonce,
            to,
        })
    }
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub hash: TxHash,
    pub raw: Bytes,
    pub from: Address,
    pub nonce: u64,
    pub to: TxKind,
}

impl SignedTransaction {
    /// Address a deployment will create, derived from sender and nonce.
    pub fn create_address(&self) -> Option<Address> {
        match self.to {
            TxKind::Create => Some(self.from.create(self.nonce)),
            TxKind::Call(_) => None,
        }
    }
}

/// Resolves nonces and gas prices against one chain.
pub struct TxBuilder<'a> {
    rpc: &'a dyn ChainRpc,
    gas_price_floor: Option<u128>,
}

impl<'a> TxBuilder<'a> {
    pub fn new(rpc: &'a dyn ChainRpc) -> Self {
        Self {
            rpc,
            gas_price_floor: None,
        }
    }

    /// Use `floor` (wei) whenever the node suggests a lower gas price.
    pub fn with_gas_price_floor(mut self, floor: Option<u128>) -> Self {
        self.gas_price_floor = floor.filter(|f| *f > 0);
        self
    }

    /// Resolve nonce and gas price for a zero-value call from `key`.
    pub async fn authorize(&self, key: &AdminKey, gas_limit: u64) -> BlockchainResult<AuthContext> {
        let from = key.address();
        let nonce = self.nonce(from).await?;
        let gas_price = self.gas_price().await?;

        Ok(AuthContext {
            from,
            nonce,
            value: U256::ZERO,
            gas_limit,
            gas_price,
            chain_id: self.rpc.evm_chain_id(),
        })
    }

    /// Resolve nonce, gas price and an estimated gas limit for a transfer.
    pub async fn authorize_transfer(
        &self,
        key: &AdminKey,
        to: Address,
        amount: U256,
    ) -> BlockchainResult<AuthContext> {
        let from = key.address();
        let nonce = self.nonce(from).await?;
        let gas_price = self.gas_price().await?;

        let estimate = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_value(amount)
            .with_gas_price(gas_price)
            .with_input(Bytes::new());
        let gas_limit = self
            .rpc
            .estimate_gas(estimate)
            .await
            .map_err(|e| BlockchainError::GasEstimate {
                to,
                reason: e.to_string(),
            })?;

        Ok(AuthContext {
            from,
            nonce,
            value: amount,
            gas_limit,
            gas_price,
            chain_id: self.rpc.evm_chain_id(),
        })
    }

    async fn nonce(&self, address: Address) -> BlockchainResult<u64> {
        self.rpc
            .pending_nonce(address)
            .await
            .map_err(|e| BlockchainError::NonceQuery {
                address,
                reason: e.to_string(),
            })
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        let suggested = self
            .rpc
            .gas_price()
            .await
            .map_err(|e| BlockchainError::GasPriceQuery(e.to_string()))?;

        match self.gas_price_floor {
            Some(floor) if floor > suggested => {
                tracing::debug!(suggested, floor, "Using gas price floor");
                Ok(floor)
            }
            _ => Ok(suggested),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn auth(key: &AdminKey) -> AuthContext {
        AuthContext {
            from: key.address(),
            nonce: 3,
            value: U256::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: 5 * GWEI,
            chain_id: Some(31337),
        }
    }

    #[test]
    fn test_intent_request_fields() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let to = Address::repeat_byte(0x22);
        let tx = auth(&key).call(to, Bytes::from_static(&[1, 2, 3])).into_request();

        assert_eq!(tx.nonce, Some(3));
        assert_eq!(tx.gas_price, Some(5 * GWEI));
        assert_eq!(tx.gas, Some(DEFAULT_GAS_LIMIT));
        assert_eq!(tx.to, Some(TxKind::Call(to)));
        assert_eq!(tx.chain_id, Some(31337));
    }

    #[tokio::test]
    async fn test_sign_deploy_predicts_address() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let signed = auth(&key)
            .deploy(Bytes::from_static(&[0x60, 0x00]))
            .sign(&key)
            .await
            .unwrap();

        assert_eq!(signed.hash, keccak256(&signed.raw));
        assert_eq!(signed.create_address(), Some(key.address().create(3)));
    }

    #[tokio::test]
    async fn test_sign_rejects_foreign_key() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let mut intent = auth(&key).transfer(Address::repeat_byte(0x01));
        intent.from = Address::repeat_byte(0x02);
        assert!(matches!(
            intent.sign(&key).await,
            Err(BlockchainError::Signing(_))
        ));
    }
}
