//! Ownership handover along the custody chain ECCD → ECCM → CCMP → operator.

use std::fmt;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;

use crate::blockchain::transaction::DEFAULT_GAS_LIMIT;
use crate::blockchain::SubmissionOutcome;
use crate::config::ContractRole;
use crate::context::BridgeAdminContext;
use crate::contracts::{EthCrossChainData, EthCrossChainManager, EthCrossChainManagerProxy};
use crate::error::{BridgeError, BridgeResult};
use crate::operations::ensure_landed;

/// Current `owner()` of each deployed contract. `None` when not deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractOwners {
    pub data_store: Option<(Address, Address)>,
    pub manager: Option<(Address, Address)>,
    pub manager_proxy: Option<(Address, Address)>,
}

impl fmt::Display for ContractOwners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            (ContractRole::DataStore, self.data_store),
            (ContractRole::Manager, self.manager),
            (ContractRole::ManagerProxy, self.manager_proxy),
        ];
        for (role, entry) in rows {
            match entry {
                Some((contract, owner)) => writeln!(f, "{} {} owned by {}", role, contract, owner)?,
                None => writeln!(f, "{} not deployed", role)?,
            }
        }
        Ok(())
    }
}

impl BridgeAdminContext {
    /// Hand ECCD ownership to the deployed ECCM.
    pub async fn transfer_data_store_ownership(&self) -> BridgeResult<SubmissionOutcome> {
        tracing::info!("start to transfer eccd ownership...");
        let eccd = self.require(ContractRole::DataStore)?;
        let eccm = self.require(ContractRole::Manager)?;
        let input = EthCrossChainData::transferOwnershipCall { newOwner: eccm }.abi_encode();
        self.transfer_ownership(ContractRole::DataStore, eccd, ContractRole::Manager.to_string(), eccm, input)
            .await
    }

    /// Hand ECCM ownership to the deployed CCMP.
    pub async fn transfer_manager_ownership(&self) -> BridgeResult<SubmissionOutcome> {
        tracing::info!("start to transfer eccm ownership...");
        let eccm = self.require(ContractRole::Manager)?;
        let ccmp = self.require(ContractRole::ManagerProxy)?;
        let input = EthCrossChainManager::transferOwnershipCall { newOwner: ccmp }.abi_encode();
        self.transfer_ownership(
            ContractRole::Manager,
            eccm,
            ContractRole::ManagerProxy.to_string(),
            ccmp,
            input,
        )
        .await
    }

    /// Hand CCMP ownership to an operator-chosen account.
    pub async fn transfer_manager_proxy_ownership(&self, new_owner: Address) -> BridgeResult<SubmissionOutcome> {
        tracing::info!("start to transfer ccmp ownership...");
        if new_owner == Address::ZERO {
            return Err(BridgeError::Usage("new ccmp owner must not be the zero address".into()));
        }
        let ccmp = self.require(ContractRole::ManagerProxy)?;
        let input = EthCrossChainManagerProxy::transferOwnershipCall { newOwner: new_owner }.abi_encode();
        self.transfer_ownership(ContractRole::ManagerProxy, ccmp, "owner".to_string(), new_owner, input)
            .await
    }

    /// Read `owner()` of every deployed contract on the selected chain.
    pub async fn owners(&self) -> BridgeResult<ContractOwners> {
        let cc = self.chain_config()?;
        let transactor = self.side_transactor();
        let action = format!("read owners on chain {}", self.chain());

        let mut owners = ContractOwners::default();
        if let Some(eccd) = cc.deployed(ContractRole::DataStore) {
            let owner = transactor
                .read(eccd, EthCrossChainData::ownerCall {})
                .await
                .map_err(BridgeError::operation(action.clone()))?;
            owners.data_store = Some((eccd, owner));
        }
        if let Some(eccm) = cc.deployed(ContractRole::Manager) {
            let owner = transactor
                .read(eccm, EthCrossChainManager::ownerCall {})
                .await
                .map_err(BridgeError::operation(action.clone()))?;
            owners.manager = Some((eccm, owner));
        }
        if let Some(ccmp) = cc.deployed(ContractRole::ManagerProxy) {
            let owner = transactor
                .read(ccmp, EthCrossChainManagerProxy::ownerCall {})
                .await
                .map_err(BridgeError::operation(action))?;
            owners.manager_proxy = Some((ccmp, owner));
        }
        Ok(owners)
    }

    async fn transfer_ownership(
        &self,
        role: ContractRole,
        contract: Address,
        new_owner_label: String,
        new_owner: Address,
        input: Vec<u8>,
    ) -> BridgeResult<SubmissionOutcome> {
        let chain = self.chain();
        let action = format!(
            "transfer {} {} ownership to {} {} on chain {}",
            role, contract, new_owner_label, new_owner, chain
        );
        let transactor = self.side_transactor();

        let outcome = transactor
            .call(self.admin(), contract, input.into(), DEFAULT_GAS_LIMIT)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(chain, &action, outcome)?;
        tracing::info!(tx_hash = %outcome.tx_hash, "{} success", action);

        // all three contracts share the Ownable owner() selector
        match transactor.read(contract, EthCrossChainData::ownerCall {}).await {
            Ok(owner) if owner == new_owner => {
                tracing::info!(contract = %contract, owner = %owner, "Ownership verified");
            }
            Ok(owner) => {
                tracing::warn!(
                    contract = %contract,
                    expected = %new_owner,
                    actual = %owner,
                    "Owner read back does not match yet"
                );
            }
            Err(e) => {
                tracing::warn!(contract = %contract, error = %e, "Failed to read back owner");
            }
        }
        Ok(outcome)
    }
}
