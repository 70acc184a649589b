//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! --loglevel flag / RUST_LOG
//!     → logging.rs (EnvFilter + fmt layer)
//!
//! All subsystems emit structured `tracing` events:
//!     → transaction hashes, senders, nonces, receipt logs
//!     → never keys or passphrases
//! ```

pub mod logging;

pub use logging::init_logging;
