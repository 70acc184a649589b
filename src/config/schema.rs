//! Configuration schema definitions.
//!
//! This module defines the on-disk JSON layout of the bridge admin tool. Keys
//! are PascalCase so that files written by earlier deployments keep loading.
//! Contract addresses are stored as hex strings; an empty string means the
//! contract has not been deployed yet.

use std::fmt;
use std::path::PathBuf;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::routing::ChainId;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct BridgeConfig {
    /// Directory of the passphrase store.
    #[serde(rename = "LevelDB", default)]
    pub level_db: PathBuf,

    /// Directory holding the admin accounts' encrypted keystore files.
    #[serde(default)]
    pub keystore: PathBuf,

    /// Admin accounts selectable with `--admin`.
    #[serde(default)]
    pub admin_account_list: Vec<Address>,

    /// Directory holding compiled contract bytecode (`eccd.bin`, ...).
    #[serde(default = "default_contract_dir")]
    pub contract_dir: PathBuf,

    /// Relay chain settings.
    #[serde(default)]
    pub poly: RelayConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethereum: Option<ChainConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bsc: Option<ChainConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heco: Option<ChainConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<ChainConfig>,
}

fn default_contract_dir() -> PathBuf {
    PathBuf::from("./contracts")
}

impl BridgeConfig {
    /// Resolve a chain identifier to its side-chain configuration.
    pub fn resolve(&self, chain: ChainId) -> Result<&ChainConfig, ConfigError> {
        let section = match chain {
            ChainId::ETHEREUM => &self.ethereum,
            ChainId::BSC => &self.bsc,
            ChainId::HECO => &self.heco,
            ChainId::OKEX => &self.ok,
            _ => return Err(ConfigError::UnknownChain(chain)),
        };
        let cc = section
            .as_ref()
            .ok_or(ConfigError::MissingChainSection(chain))?;
        if cc.side_chain_id != chain {
            return Err(ConfigError::ChainIdMismatch {
                section: chain,
                configured: cc.side_chain_id,
            });
        }
        Ok(cc)
    }

    /// Mutable variant of [`BridgeConfig::resolve`] used by deploy operations.
    pub fn resolve_mut(&mut self, chain: ChainId) -> Result<&mut ChainConfig, ConfigError> {
        // validate first so the mutable borrow below needs no re-check
        self.resolve(chain)?;
        let section = match chain {
            ChainId::ETHEREUM => &mut self.ethereum,
            ChainId::BSC => &mut self.bsc,
            ChainId::HECO => &mut self.heco,
            ChainId::OKEX => &mut self.ok,
            _ => return Err(ConfigError::UnknownChain(chain)),
        };
        section
            .as_mut()
            .ok_or(ConfigError::MissingChainSection(chain))
    }

    /// Admin address at `index` in the admin-account list.
    pub fn admin_account(&self, index: usize) -> Result<Address, ConfigError> {
        self.admin_account_list
            .get(index)
            .copied()
            .ok_or(ConfigError::AdminIndexOutOfRange {
                index,
                len: self.admin_account_list.len(),
            })
    }
}

/// Relay chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RelayConfig {
    /// JSON-RPC endpoint of a relay chain node.
    #[serde(rename = "RPC")]
    pub rpc: String,

    /// Directory of the relay validators' keystore files.
    pub keystore: PathBuf,

    /// Passphrase shared by the validator keystore files.
    pub passphrase: String,

    /// Side-chain manager native contract.
    #[serde(default = "default_side_chain_manager")]
    pub side_chain_manager: Address,

    /// Header-sync native contract.
    #[serde(default = "default_header_sync")]
    pub header_sync: Address,
}

fn default_side_chain_manager() -> Address {
    SIDE_CHAIN_MANAGER_ADDRESS
}

fn default_header_sync() -> Address {
    HEADER_SYNC_ADDRESS
}

/// Default address of the relay chain's side-chain manager contract.
pub const SIDE_CHAIN_MANAGER_ADDRESS: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10, 0x04,
]);

/// Default address of the relay chain's header-sync contract.
pub const HEADER_SYNC_ADDRESS: Address = Address::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10, 0x05,
]);

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            rpc: "http://localhost:20336".to_string(),
            keystore: PathBuf::from("./poly_keystore"),
            passphrase: String::new(),
            side_chain_manager: SIDE_CHAIN_MANAGER_ADDRESS,
            header_sync: HEADER_SYNC_ADDRESS,
        }
    }
}

/// Bridge contract held in a [`ChainConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractRole {
    /// Cross-chain data store (ECCD).
    DataStore,
    /// Cross-chain manager (ECCM).
    Manager,
    /// Cross-chain manager proxy (CCMP).
    ManagerProxy,
    /// Lock proxy holding bound assets.
    LockProxy,
}

impl fmt::Display for ContractRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContractRole::DataStore => "eccd",
            ContractRole::Manager => "eccm",
            ContractRole::ManagerProxy => "ccmp",
            ContractRole::LockProxy => "lock proxy",
        };
        f.write_str(name)
    }
}

/// Per side-chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChainConfig {
    #[serde(rename = "SideChainID")]
    pub side_chain_id: ChainId,

    #[serde(rename = "SideChainName", default)]
    pub side_chain_name: String,

    /// JSON-RPC endpoint of the side chain.
    #[serde(rename = "RPC")]
    pub rpc: String,

    #[serde(rename = "ECCD", default)]
    eccd: ContractSlot,

    #[serde(rename = "ECCM", default)]
    eccm: ContractSlot,

    #[serde(rename = "CCMP", default)]
    ccmp: ContractSlot,

    #[serde(rename = "LockProxy", default)]
    lock_proxy: ContractSlot,
}

impl ChainConfig {
    /// New configuration with no contracts deployed.
    pub fn new(side_chain_id: ChainId, name: impl Into<String>, rpc: impl Into<String>) -> Self {
        Self {
            side_chain_id,
            side_chain_name: name.into(),
            rpc: rpc.into(),
            eccd: ContractSlot::default(),
            eccm: ContractSlot::default(),
            ccmp: ContractSlot::default(),
            lock_proxy: ContractSlot::default(),
        }
    }

    fn slot(&self, role: ContractRole) -> &ContractSlot {
        match role {
            ContractRole::DataStore => &self.eccd,
            ContractRole::Manager => &self.eccm,
            ContractRole::ManagerProxy => &self.ccmp,
            ContractRole::LockProxy => &self.lock_proxy,
        }
    }

    /// Configured address for a role, as written in the file.
    ///
    /// A value that is not a valid address reads as the zero address.
    pub fn address(&self, role: ContractRole) -> Option<Address> {
        self.slot(role).address
    }

    /// Configured address for a role, treating empty and zero as "not set".
    pub fn deployed(&self, role: ContractRole) -> Option<Address> {
        self.address(role).filter(|addr| !addr.is_zero())
    }

    /// Record the address of a freshly deployed contract.
    ///
    /// This is the only mutator for contract addresses: a role's address is
    /// replaced only by a new deployment of that same role.
    pub fn record_deployment(&mut self, role: ContractRole, address: Address) {
        let slot = match role {
            ContractRole::DataStore => &mut self.eccd,
            ContractRole::Manager => &mut self.eccm,
            ContractRole::ManagerProxy => &mut self.ccmp,
            ContractRole::LockProxy => &mut self.lock_proxy,
        };
        if let Some(previous) = slot.address.filter(|addr| !addr.is_zero() && *addr != address) {
            tracing::warn!(
                chain_id = %self.side_chain_id,
                role = %role,
                previous = %previous,
                new = %address,
                "Replacing previously deployed contract address"
            );
        }
        *slot = ContractSlot::recorded(address);
    }
}

/// A contract address field together with the text it was read from.
///
/// Persisting writes the original text back, so fields no command touched
/// keep their exact spelling. Only a new deployment rewrites the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ContractSlot {
    text: String,
    address: Option<Address>,
}

impl ContractSlot {
    fn recorded(address: Address) -> Self {
        Self {
            text: address.to_checksum(None),
            address: Some(address),
        }
    }

    fn parse(text: String) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self {
                text,
                address: None,
            };
        }
        let address = match trimmed.parse::<Address>() {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!(value = %trimmed, error = %e, "Invalid contract address, treating as not deployed");
                Address::ZERO
            }
        };
        Self {
            text,
            address: Some(address),
        }
    }
}

impl Serialize for ContractSlot {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for ContractSlot {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let text = Option::<String>::deserialize(d)?.unwrap_or_default();
        Ok(Self::parse(text))
    }
}
