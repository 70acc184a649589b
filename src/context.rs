//! Per-invocation admin context.
//!
//! # Responsibilities
//! - Run the startup sequence (store, chain, keystore, admin key, gas floor, RPC)
//! - Own the loaded configuration and persist it after mutations
//! - Hand out transactors bound to the side chain or the relay chain
//!
//! # Design Decisions
//! - Built once in `main` and passed by `&mut` to one command handler
//! - Relay chain handles are connected on first use; most commands never
//!   touch the relay chain
//! - RPC backend and clock are trait objects so tests can inject mocks

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;

use crate::blockchain::client::DEFAULT_RPC_TIMEOUT_SECS;
use crate::blockchain::transaction::GWEI;
use crate::blockchain::wallet::{load_account, load_account_dir, DEFAULT_ACCOUNT_PASSPHRASE};
use crate::blockchain::{AdminKey, BlockchainClient, ChainRpc, Clock, PollSchedule, TokioClock};
use crate::config::{save_config, BridgeConfig, ChainConfig, ConfigError, ContractRole};
use crate::contracts::ContractArtifacts;
use crate::error::{BridgeError, BridgeResult};
use crate::operations::Transactor;
use crate::routing::ChainId;
use crate::storage::PassphraseStore;

/// Startup parameters taken from the global CLI flags.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub config_path: PathBuf,
    pub chain: ChainId,
    pub admin_index: usize,
    /// Gas price floor in gwei; 0 disables it.
    pub add_gas_gwei: u64,
}

/// Connected relay chain and its validator keys.
#[derive(Clone)]
pub struct RelayHandle {
    pub rpc: Arc<dyn ChainRpc>,
    pub validators: Vec<AdminKey>,
}

impl std::fmt::Debug for RelayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayHandle")
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// Everything one command needs: config, chain, admin key and RPC handles.
pub struct BridgeAdminContext {
    config_path: PathBuf,
    config: BridgeConfig,
    chain: ChainId,
    admin: AdminKey,
    passphrases: PassphraseStore,
    gas_price_floor: Option<u128>,
    side: Arc<dyn ChainRpc>,
    relay: Option<RelayHandle>,
    clock: Arc<dyn Clock>,
    schedule: PollSchedule,
    artifacts: ContractArtifacts,
}

impl BridgeAdminContext {
    /// Build the context from an already loaded configuration.
    ///
    /// Logging must be initialised before this runs.
    pub async fn establish(options: &ContextOptions, config: BridgeConfig) -> BridgeResult<Self> {
        let passphrases = PassphraseStore::open(&config.level_db).map_err(|source| BridgeError::Io {
            path: config.level_db.clone(),
            source,
        })?;

        let cc = config.resolve(options.chain)?;
        if !config.keystore.is_dir() {
            return Err(ConfigError::MissingKeystore(config.keystore.clone()).into());
        }
        let admin_address = config.admin_account(options.admin_index)?;
        let admin = load_account(
            &passphrases,
            &config.keystore,
            admin_address,
            DEFAULT_ACCOUNT_PASSPHRASE,
        )
        .map_err(BridgeError::operation(format!(
            "load eth account for chain {}",
            cc.side_chain_id
        )))?;

        let gas_price_floor =
            (options.add_gas_gwei > 0).then(|| u128::from(options.add_gas_gwei) * GWEI);

        let client = BlockchainClient::connect(&cc.rpc, DEFAULT_RPC_TIMEOUT_SECS)
            .await
            .map_err(BridgeError::operation(format!(
                "connect rpc for chain {}",
                cc.side_chain_id
            )))?;

        tracing::info!(
            chain = %options.chain,
            admin = %admin.address(),
            gas_price_floor = ?gas_price_floor,
            "Admin context ready"
        );

        let mut ctx = Self::with_rpc(
            options.config_path.clone(),
            config,
            options.chain,
            admin,
            Arc::new(client),
        )?;
        ctx.passphrases = passphrases;
        ctx.gas_price_floor = gas_price_floor;
        Ok(ctx)
    }

    /// Build a context over an existing RPC backend.
    pub fn with_rpc(
        config_path: impl Into<PathBuf>,
        config: BridgeConfig,
        chain: ChainId,
        admin: AdminKey,
        side: Arc<dyn ChainRpc>,
    ) -> BridgeResult<Self> {
        config.resolve(chain)?;
        let artifacts = ContractArtifacts::new(config.contract_dir.clone());
        Ok(Self {
            config_path: config_path.into(),
            config,
            chain,
            admin,
            passphrases: PassphraseStore::default(),
            gas_price_floor: None,
            side,
            relay: None,
            clock: Arc::new(TokioClock),
            schedule: PollSchedule::default(),
            artifacts,
        })
    }

    /// Use an already connected relay chain instead of dialing `Poly.RPC`.
    pub fn with_relay(mut self, rpc: Arc<dyn ChainRpc>, validators: Vec<AdminKey>) -> Self {
        self.relay = Some(RelayHandle { rpc, validators });
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>, schedule: PollSchedule) -> Self {
        self.clock = clock;
        self.schedule = schedule;
        self
    }

    pub fn with_gas_price_floor(mut self, floor: Option<u128>) -> Self {
        self.gas_price_floor = floor;
        self
    }

    pub fn chain(&self) -> ChainId {
        self.chain
    }

    pub fn admin(&self) -> &AdminKey {
        &self.admin
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn side_rpc(&self) -> &dyn ChainRpc {
        self.side.as_ref()
    }

    pub(crate) fn artifacts(&self) -> &ContractArtifacts {
        &self.artifacts
    }

    pub(crate) fn passphrases(&self) -> &PassphraseStore {
        &self.passphrases
    }

    /// Configuration of the selected side chain.
    pub fn chain_config(&self) -> BridgeResult<&ChainConfig> {
        Ok(self.config.resolve(self.chain)?)
    }

    /// Deployed address of `role` on the selected chain.
    pub fn require(&self, role: ContractRole) -> BridgeResult<Address> {
        self.chain_config()?
            .deployed(role)
            .ok_or(BridgeError::MissingContract {
                chain: self.chain,
                role,
            })
    }

    /// Record a deployment and rewrite the config file.
    pub(crate) fn record_deployment(&mut self, role: ContractRole, address: Address) -> BridgeResult<()> {
        self.config
            .resolve_mut(self.chain)?
            .record_deployment(role, address);
        self.persist()
    }

    /// Write the configuration back to its file.
    pub fn persist(&self) -> BridgeResult<()> {
        save_config(&self.config_path, &self.config)?;
        tracing::info!(path = %self.config_path.display(), "update config success!");
        Ok(())
    }

    /// Transactor bound to the selected side chain.
    pub(crate) fn side_transactor(&self) -> Transactor<'_> {
        self.transactor(self.side.as_ref())
    }

    /// Transactor bound to `rpc` sharing this context's clock, schedule and floor.
    pub(crate) fn transactor<'a>(&'a self, rpc: &'a dyn ChainRpc) -> Transactor<'a> {
        Transactor::new(rpc, self.clock.as_ref(), self.schedule)
            .with_gas_price_floor(self.gas_price_floor)
    }

    /// Relay chain handle, connecting and loading validator keys on first use.
    pub(crate) async fn relay(&mut self) -> BridgeResult<RelayHandle> {
        if let Some(relay) = &self.relay {
            return Ok(relay.clone());
        }

        let poly = &self.config.poly;
        let validators = load_account_dir(&poly.keystore, &poly.passphrase)
            .map_err(BridgeError::operation("load poly validators"))?;
        if validators.is_empty() {
            return Err(BridgeError::NoValidators(poly.keystore.clone()));
        }
        let client = BlockchainClient::connect(&poly.rpc, DEFAULT_RPC_TIMEOUT_SECS)
            .await
            .map_err(BridgeError::operation("connect poly chain"))?;
        tracing::info!(
            rpc_url = %poly.rpc,
            validators = validators.len(),
            "Relay chain connected"
        );

        let relay = RelayHandle {
            rpc: Arc::new(client),
            validators,
        };
        self.relay = Some(relay.clone());
        Ok(relay)
    }
}

impl std::fmt::Debug for BridgeAdminContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeAdminContext")
            .field("config_path", &self.config_path)
            .field("chain", &self.chain)
            .field("admin", &self.admin)
            .field("gas_price_floor", &self.gas_price_floor)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}
