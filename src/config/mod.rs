//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.json
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (owned by the admin context)
//!     → resolve(chain) → ChainConfig
//!
//! After every deploy:
//!     ChainConfig::record_deployment
//!     → loader.rs save_config (atomic rewrite)
//! ```
//!
//! # Design Decisions
//! - Unknown chains are a typed error; only the CLI boundary exits
//! - Contract addresses change only through `record_deployment`
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, save_config, ConfigError};
pub use schema::{BridgeConfig, ChainConfig, ContractRole, RelayConfig};
