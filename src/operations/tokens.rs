//! Asset binding on the lock proxy.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;

use crate::blockchain::transaction::DEFAULT_GAS_LIMIT;
use crate::blockchain::SubmissionOutcome;
use crate::config::ContractRole;
use crate::context::BridgeAdminContext;
use crate::contracts::LockProxy;
use crate::error::{BridgeError, BridgeResult};
use crate::operations::ensure_landed;
use crate::routing::ChainId;

impl BridgeAdminContext {
    /// Bind `src_asset` on this chain to `dst_asset` on `dst_chain`.
    pub async fn bind_asset(
        &self,
        src_asset: Address,
        dst_chain: ChainId,
        dst_asset: Address,
    ) -> BridgeResult<SubmissionOutcome> {
        tracing::info!("start to bind asset...");
        let chain = self.chain();
        let proxy = self.require(ContractRole::LockProxy)?;
        let dst_proxy = self
            .config()
            .resolve(dst_chain)
            .ok()
            .and_then(|cc| cc.deployed(ContractRole::LockProxy));

        let action = format!(
            "bind asset (src chain id {}, src asset {}, src proxy {}) - (dst chain id {}, dst asset {}, dst proxy {}) for user {}",
            chain,
            src_asset,
            proxy,
            dst_chain,
            dst_asset,
            dst_proxy.map(|a| a.to_string()).unwrap_or_default(),
            self.admin().address()
        );

        let input = LockProxy::bindAssetHashCall {
            fromAssetHash: src_asset,
            toChainId: dst_chain.0,
            toAssetHash: dst_asset.to_vec().into(),
        }
        .abi_encode();

        let outcome = self
            .side_transactor()
            .call(self.admin(), proxy, input.into(), DEFAULT_GAS_LIMIT)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(chain, &action, outcome)?;
        tracing::info!("{} success! txhash {}", action, outcome.tx_hash);
        Ok(outcome)
    }
}
