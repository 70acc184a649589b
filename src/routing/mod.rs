//! Chain routing subsystem.
//!
//! # Data Flow
//! ```text
//! --chain flag (u64)
//!     → chain.rs (ChainId, known identifiers)
//!     → config registry (ChainConfig for the side chain)
//!     → family.rs (router id, registration extra info, genesis source)
//! ```
//!
//! # Design Decisions
//! - One lookup per concern instead of repeated `match` on raw ids
//! - Unknown ids are explicit `None`/errors, never a silent default

pub mod chain;
pub mod family;

pub use chain::ChainId;
pub use family::{ChainFamily, GenesisSource};
