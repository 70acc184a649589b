//! Native coin transfers and balances, plus the environment report.

use alloy::primitives::{Address, U256};

use crate::blockchain::wallet::{load_account, DEFAULT_ACCOUNT_PASSPHRASE};
use crate::blockchain::SubmissionOutcome;
use crate::context::BridgeAdminContext;
use crate::error::{BridgeError, BridgeResult};
use crate::operations::ensure_landed;
use crate::routing::ChainId;

impl BridgeAdminContext {
    /// Send `amount` wei of the native coin from `from` (default: the admin) to `to`.
    pub async fn transfer_native(
        &self,
        from: Option<Address>,
        to: Address,
        amount: U256,
    ) -> BridgeResult<SubmissionOutcome> {
        let cc = self.chain_config()?;
        tracing::info!("start to transfer native token on chain {}...", cc.side_chain_name);

        let loaded;
        let key = match from {
            Some(address) if address != self.admin().address() => {
                loaded = load_account(
                    self.passphrases(),
                    &self.config().keystore,
                    address,
                    DEFAULT_ACCOUNT_PASSPHRASE,
                )?;
                &loaded
            }
            _ => self.admin(),
        };

        let chain = self.chain();
        let action = format!("{} transfer {} to {} on chain {}", key.address(), amount, to, chain);
        let outcome = self
            .side_transactor()
            .transfer(key, to, amount)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(chain, &action, outcome)?;
        tracing::info!("{} success, txhash {}", action, outcome.tx_hash);
        Ok(outcome)
    }

    /// Native coin balance of `owner` in wei.
    pub async fn native_balance(&self, owner: Address) -> BridgeResult<U256> {
        let balance = self
            .side_rpc()
            .balance(owner)
            .await
            .map_err(BridgeError::operation("get native balance"))?;
        tracing::info!("{} native balance is {}", owner, balance);
        Ok(balance)
    }

    /// Describe the selected chain and the known chain ids, then check that
    /// `owner`'s keystore unlocks with the well-known passphrase.
    pub fn env_report(&self, owner: Address) -> BridgeResult<String> {
        let cc = self.chain_config()?;
        let mut report = format!(
            "current env: side chain name {}, side chain id {}\n",
            cc.side_chain_name, cc.side_chain_id
        );
        for id in ChainId::KNOWN {
            if let Some(name) = id.name() {
                report.push_str(&format!("{} side chain id - {}\n", name, id));
            }
        }

        tracing::info!(
            keystore = %self.config().keystore.display(),
            "check your owner address {} in keystore dir",
            owner
        );
        load_account(
            self.passphrases(),
            &self.config().keystore,
            owner,
            DEFAULT_ACCOUNT_PASSPHRASE,
        )?;
        Ok(report)
    }
}
