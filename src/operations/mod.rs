//! Contract operation façade.
//!
//! # Responsibilities
//! - Deploy the side-chain contracts and record their addresses
//! - Bind assets and hand contract ownership down the custody chain
//! - Register, approve and genesis-sync side chains on the relay chain
//! - Native transfers and balance queries
//!
//! # Data Flow
//! ```text
//! BridgeAdminContext
//!     → Transactor (authorize → encode → sign → submit → confirm)
//!     → SubmissionOutcome
//!     → Confirmed / TimedOutUnknown: update config, persist
//!     → FailedOnChain: BridgeError::Reverted, config untouched
//! ```

pub mod deploy;
pub mod native;
pub mod ownership;
pub mod relay;
pub mod tokens;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::blockchain::{
    AdminKey, BlockchainError, BlockchainResult, ChainRpc, Clock, Confirmer, PollSchedule,
    SubmissionOutcome, TxBuilder, TxStatus,
};
use crate::error::{BridgeError, BridgeResult};
use crate::routing::ChainId;

pub use ownership::ContractOwners;

/// Authorize, sign, submit and confirm transactions against one chain.
pub struct Transactor<'a> {
    rpc: &'a dyn ChainRpc,
    builder: TxBuilder<'a>,
    confirmer: Confirmer<'a>,
}

impl<'a> Transactor<'a> {
    pub fn new(rpc: &'a dyn ChainRpc, clock: &'a dyn Clock, schedule: PollSchedule) -> Self {
        Self {
            rpc,
            builder: TxBuilder::new(rpc),
            confirmer: Confirmer::new(rpc, clock, schedule),
        }
    }

    pub fn with_gas_price_floor(mut self, floor: Option<u128>) -> Self {
        self.builder = self.builder.with_gas_price_floor(floor);
        self
    }

    /// Send a contract call from `key`.
    pub async fn call(
        &self,
        key: &AdminKey,
        to: Address,
        input: Bytes,
        gas_limit: u64,
    ) -> BlockchainResult<SubmissionOutcome> {
        let auth = self.builder.authorize(key, gas_limit).await?;
        let signed = auth.call(to, input).sign(key).await?;
        self.confirmer.submit(signed).await
    }

    /// Deploy `init_code` (bytecode followed by encoded constructor args).
    pub async fn deploy(
        &self,
        key: &AdminKey,
        init_code: Bytes,
        gas_limit: u64,
    ) -> BlockchainResult<SubmissionOutcome> {
        let auth = self.builder.authorize(key, gas_limit).await?;
        let signed = auth.deploy(init_code).sign(key).await?;
        self.confirmer.submit(signed).await
    }

    /// Send `amount` wei from `key` to `to` with an estimated gas limit.
    pub async fn transfer(
        &self,
        key: &AdminKey,
        to: Address,
        amount: U256,
    ) -> BlockchainResult<SubmissionOutcome> {
        let auth = self.builder.authorize_transfer(key, to, amount).await?;
        let signed = auth.transfer(to).sign(key).await?;
        self.confirmer.submit(signed).await
    }

    /// Read-only call decoded with `C`'s return type.
    pub async fn read<C: SolCall>(&self, to: Address, call: C) -> BlockchainResult<C::Return> {
        use alloy::network::TransactionBuilder;
        use alloy::rpc::types::TransactionRequest;

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(call.abi_encode());
        let out = self.rpc.call(tx).await?;
        C::abi_decode_returns(&out)
            .map_err(|e| BlockchainError::Rpc(format!("decode {} result: {}", C::SIGNATURE, e)))
    }
}

/// Turn a reverted outcome into an error; everything else passes through.
pub(crate) fn ensure_landed(
    chain: ChainId,
    action: &str,
    outcome: SubmissionOutcome,
) -> BridgeResult<SubmissionOutcome> {
    match outcome.status {
        TxStatus::FailedOnChain { .. } => Err(BridgeError::Reverted {
            chain,
            action: action.to_string(),
            tx_hash: outcome.tx_hash,
        }),
        TxStatus::Confirmed { .. } | TxStatus::TimedOutUnknown => Ok(outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxHash;

    fn outcome(status: TxStatus) -> SubmissionOutcome {
        SubmissionOutcome {
            tx_hash: TxHash::repeat_byte(0x11),
            status,
            from: Address::ZERO,
            nonce: 0,
            contract_address: None,
        }
    }

    #[test]
    fn test_reverted_is_error() {
        let err = ensure_landed(
            ChainId::BSC,
            "bind asset",
            outcome(TxStatus::FailedOnChain { block_number: Some(5) }),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::Reverted { chain: ChainId::BSC, .. }));
    }

    #[test]
    fn test_timeout_is_soft_success() {
        assert!(ensure_landed(ChainId::BSC, "bind asset", outcome(TxStatus::TimedOutUnknown)).is_ok());
        assert!(ensure_landed(
            ChainId::BSC,
            "bind asset",
            outcome(TxStatus::Confirmed { block_number: 9 })
        )
        .is_ok());
    }
}
