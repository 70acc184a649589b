//! Cross-chain bridge administration library.

pub mod blockchain;
pub mod commands;
pub mod config;
pub mod context;
pub mod contracts;
pub mod error;
pub mod observability;
pub mod operations;
pub mod routing;
pub mod storage;

pub use config::schema::BridgeConfig;
pub use context::BridgeAdminContext;
pub use error::{BridgeError, BridgeResult};
