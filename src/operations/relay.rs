//! Side-chain registration and genesis header exchange with the relay chain.
//!
//! Relay-chain writes are signed by the relay validators and sent to the
//! side-chain manager and header-sync native contracts. Registration uses the
//! first validator; approval and header sync need every validator's vote.

use std::path::Path;

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

use crate::blockchain::transaction::DEFAULT_GAS_LIMIT;
use crate::blockchain::{AdminKey, SubmissionOutcome};
use crate::config::ContractRole;
use crate::context::{BridgeAdminContext, RelayHandle};
use crate::contracts::{read_hex_file, EthCrossChainManager, IHeaderSync, ISideChainManager};
use crate::error::{BridgeError, BridgeResult};
use crate::operations::ensure_landed;
use crate::routing::{ChainFamily, ChainId, GenesisSource};

/// Blocks the relay chain waits before treating a side-chain header as final.
const BLOCKS_TO_WAIT: u64 = 1;

impl BridgeAdminContext {
    /// Register the selected side chain on the relay chain.
    pub async fn register_side_chain(&mut self) -> BridgeResult<SubmissionOutcome> {
        let chain = self.chain();
        let family = ChainFamily::of(chain).ok_or(BridgeError::UnsupportedChain(chain))?;
        let eccd = self.require(ContractRole::DataStore)?;
        let name = self.chain_config()?.side_chain_name.clone();
        let extra_info = family
            .extra_info(chain)
            .map_err(|e| BridgeError::Encode {
                what: "side chain extra info",
                reason: e.to_string(),
            })?;

        let relay = self.relay().await?;
        let registrar = first_validator(&relay, self)?;
        let input = ISideChainManager::registerSideChainCall {
            chainID: chain.0,
            router: family.router(),
            name,
            blocksToWait: BLOCKS_TO_WAIT,
            CCMCAddress: eccd.to_vec().into(),
            extraInfo: extra_info,
        }
        .abi_encode();

        let action = format!("register side chain {} eccd {}", chain, eccd);
        let manager = self.config().poly.side_chain_manager;
        let outcome = self
            .transactor(relay.rpc.as_ref())
            .call(registrar, manager, input.into(), DEFAULT_GAS_LIMIT)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(ChainId::POLY, &action, outcome)?;
        tracing::info!(tx_hash = %outcome.tx_hash, "{} success", action);
        Ok(outcome)
    }

    /// Approve the pending registration with every relay validator.
    pub async fn approve_side_chain(&mut self) -> BridgeResult<Vec<SubmissionOutcome>> {
        let chain = self.chain();
        let relay = self.relay().await?;
        let manager = self.config().poly.side_chain_manager;
        let input: Bytes = ISideChainManager::approveRegisterSideChainCall { chainID: chain.0 }
            .abi_encode()
            .into();

        let action = format!("approve register side chain {}", chain);
        let outcomes = self
            .relay_vote(&relay, manager, input, &action)
            .await?;
        tracing::info!("{} success", action);
        Ok(outcomes)
    }

    /// Sync the side chain's genesis header to the relay chain.
    ///
    /// `hex_file` overrides the header source; otherwise the chain family
    /// picks the height (`epoch` is required for operator-epoch chains).
    pub async fn sync_side_genesis(
        &mut self,
        hex_file: Option<&Path>,
        epoch: u64,
    ) -> BridgeResult<Vec<SubmissionOutcome>> {
        let chain = self.chain();
        let name = self.chain_config()?.side_chain_name.clone();
        tracing::info!("start to sync side chain {} genesis header to poly chain...", name);
        let family = ChainFamily::of(chain).ok_or(BridgeError::UnsupportedChain(chain))?;

        let header = match hex_file {
            Some(path) => {
                let raw = read_hex_file(path).map_err(|source| BridgeError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Bytes::from(raw)
            }
            None => self.side_genesis_header(family.genesis_source(), epoch).await?,
        };

        let relay = self.relay().await?;
        let header_sync = self.config().poly.header_sync;
        let input: Bytes = IHeaderSync::syncGenesisHeaderCall {
            chainID: chain.0,
            genesisHeader: header,
        }
        .abi_encode()
        .into();

        let action = format!("sync side chain {} genesis header to poly", chain);
        let outcomes = self
            .relay_vote(&relay, header_sync, input, &action)
            .await?;
        tracing::info!("{} success!", action);
        Ok(outcomes)
    }

    /// Sync the relay chain's current header and validator keys to the side
    /// chain's manager contract.
    pub async fn sync_poly_genesis(&mut self) -> BridgeResult<SubmissionOutcome> {
        tracing::info!("start to sync poly chain genesis header to side chain...");
        let chain = self.chain();
        let eccm = self.require(ContractRole::Manager)?;
        let relay = self.relay().await?;

        let action = format!("sync poly chain genesis header to side chain {}", chain);
        let head = relay
            .rpc
            .block_number()
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let header = relay
            .rpc
            .block_header(head)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let pub_keys: Vec<u8> = relay
            .validators
            .iter()
            .flat_map(|validator| validator.public_key())
            .collect();
        tracing::debug!(
            height = header.number,
            hash = %header.hash,
            validators = relay.validators.len(),
            "Relay genesis header"
        );

        let input = EthCrossChainManager::initGenesisBlockCall {
            rawHeader: header.rlp,
            pubKeyList: pub_keys.into(),
        }
        .abi_encode();

        let outcome = self
            .side_transactor()
            .call(self.admin(), eccm, input.into(), DEFAULT_GAS_LIMIT)
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let outcome = ensure_landed(chain, &action, outcome)?;
        tracing::info!(tx_hash = %outcome.tx_hash, "{} success!", action);
        Ok(outcome)
    }

    async fn side_genesis_header(&self, source: GenesisSource, epoch: u64) -> BridgeResult<Bytes> {
        let chain = self.chain();
        let action = format!("fetch genesis header of chain {}", chain);
        let head = self
            .side_rpc()
            .block_number()
            .await
            .map_err(BridgeError::operation(action.clone()))?;
        let height = source.height(head, epoch).ok_or_else(|| {
            BridgeError::Usage(format!("--epoch is required to sync chain {} genesis header", chain))
        })?;
        let header = self
            .side_rpc()
            .block_header(height)
            .await
            .map_err(BridgeError::operation(action))?;
        tracing::info!(height, hash = %header.hash, "Side chain genesis header");
        Ok(header.json)
    }

    /// Send the same call from every validator, in order.
    async fn relay_vote(
        &self,
        relay: &RelayHandle,
        to: Address,
        input: Bytes,
        action: &str,
    ) -> BridgeResult<Vec<SubmissionOutcome>> {
        let transactor = self.transactor(relay.rpc.as_ref());
        let mut outcomes = Vec::with_capacity(relay.validators.len());
        for validator in &relay.validators {
            let outcome = transactor
                .call(validator, to, input.clone(), DEFAULT_GAS_LIMIT)
                .await
                .map_err(BridgeError::operation(format!("{} by {}", action, validator.address())))?;
            outcomes.push(ensure_landed(ChainId::POLY, action, outcome)?);
        }
        Ok(outcomes)
    }
}

fn first_validator<'a>(
    relay: &'a RelayHandle,
    ctx: &BridgeAdminContext,
) -> BridgeResult<&'a AdminKey> {
    relay
        .validators
        .first()
        .ok_or_else(|| BridgeError::NoValidators(ctx.config().poly.keystore.clone()))
}
