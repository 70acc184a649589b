//! Contract deployments.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolConstructor;

use crate::blockchain::transaction::DEFAULT_DEPLOY_GAS_LIMIT;
use crate::blockchain::BlockchainError;
use crate::config::ContractRole;
use crate::context::BridgeAdminContext;
use crate::contracts::{EthCrossChainManager, EthCrossChainManagerProxy};
use crate::error::{BridgeError, BridgeResult};
use crate::operations::ensure_landed;

impl BridgeAdminContext {
    /// Deploy the cross-chain data store.
    pub async fn deploy_data_store(&mut self) -> BridgeResult<Address> {
        tracing::info!("start to deploy eccd contract...");
        self.deploy_role(ContractRole::DataStore, Vec::new()).await
    }

    /// Deploy the cross-chain manager wired to the deployed data store.
    pub async fn deploy_manager(&mut self) -> BridgeResult<Address> {
        tracing::info!("start to deploy eccm contract...");
        let eccd = self.require(ContractRole::DataStore)?;
        let args = EthCrossChainManager::constructorCall {
            eccd,
            chainId: self.chain().0,
        }
        .abi_encode();
        self.deploy_role(ContractRole::Manager, args).await
    }

    /// Deploy the manager proxy pointing at the deployed manager.
    pub async fn deploy_manager_proxy(&mut self) -> BridgeResult<Address> {
        tracing::info!("start to deploy ccmp contract...");
        let eccm = self.require(ContractRole::Manager)?;
        let args = EthCrossChainManagerProxy::constructorCall {
            ethCrossChainManagerAddr: eccm,
        }
        .abi_encode();
        self.deploy_role(ContractRole::ManagerProxy, args).await
    }

    async fn deploy_role(&mut self, role: ContractRole, constructor_args: Vec<u8>) -> BridgeResult<Address> {
        let chain = self.chain();
        let action = format!("deploy {} for chain {}", role, chain);

        let bytecode = self.artifacts().bytecode(role).map_err(|source| BridgeError::Io {
            path: self.artifacts().path(role).unwrap_or_default(),
            source,
        })?;
        let mut init_code = bytecode.to_vec();
        init_code.extend_from_slice(&constructor_args);

        let outcome = self
            .side_transactor()
            .deploy(self.admin(), Bytes::from(init_code), DEFAULT_DEPLOY_GAS_LIMIT)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(chain, &action, outcome)?;

        let address = outcome.contract_address.ok_or_else(|| BridgeError::Operation {
            action: action.clone(),
            source: BlockchainError::NotFound(format!("contract address of {}", outcome.tx_hash)),
        })?;
        tracing::info!(tx_hash = %outcome.tx_hash, "deploy {} for chain {} success {}", role, chain, address);

        self.record_deployment(role, address)?;
        Ok(address)
    }
}
