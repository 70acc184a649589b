//! Transaction engine.
//!
//! # Data Flow
//! ```text
//! keystore file + passphrase
//!     → wallet.rs (AdminKey)
//!     → transaction.rs (nonce, gas price, floor → AuthContext → signed tx)
//!     → confirm.rs (broadcast once, poll, classify receipt)
//!     → SubmissionOutcome
//!
//! rpc.rs is the seam to the node; client.rs implements it over HTTP.
//! ```
//!
//! # Security Constraints
//! - Keys only from encrypted keystore files
//! - Never log private keys or passphrases
//! - All RPC calls have a timeout

pub mod client;
pub mod confirm;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use confirm::{Clock, Confirmer, PollSchedule, TokioClock};
pub use rpc::ChainRpc;
pub use transaction::{AuthContext, SignedTransaction, TransactionIntent, TxBuilder};
pub use types::{BlockchainError, BlockchainResult, SubmissionOutcome, TxStatus};
pub use wallet::AdminKey;
