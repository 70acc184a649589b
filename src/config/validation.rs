//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each side-chain section sits in the slot matching its id
//! - Check RPC endpoints parse as URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Filesystem checks (keystore dir) happen at context setup, not here

use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::routing::ChainId;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("section {section} declares SideChainID {declared}")]
    SideChainId { section: &'static str, declared: u64 },

    #[error("invalid RPC url '{url}' for {section}")]
    RpcUrl { section: &'static str, url: String },

    #[error("admin account list contains {0} twice")]
    DuplicateAdmin(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let sections = [
        ("Ethereum", ChainId::ETHEREUM, &config.ethereum),
        ("Bsc", ChainId::BSC, &config.bsc),
        ("Heco", ChainId::HECO, &config.heco),
        ("Ok", ChainId::OKEX, &config.ok),
    ];
    for (section, expected, cc) in sections {
        let Some(cc) = cc else { continue };
        if cc.side_chain_id != expected {
            errors.push(ValidationError::SideChainId {
                section,
                declared: cc.side_chain_id.0,
            });
        }
        if cc.rpc.parse::<url::Url>().is_err() {
            errors.push(ValidationError::RpcUrl {
                section,
                url: cc.rpc.clone(),
            });
        }
    }

    if !config.poly.rpc.is_empty() && config.poly.rpc.parse::<url::Url>().is_err() {
        errors.push(ValidationError::RpcUrl {
            section: "Poly",
            url: config.poly.rpc.clone(),
        });
    }

    for (i, admin) in config.admin_account_list.iter().enumerate() {
        if config.admin_account_list[..i].contains(admin) {
            errors.push(ValidationError::DuplicateAdmin(admin.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
