//! bridge-admin
//!
//! Operator CLI that provisions a cross-chain bridge on an EVM side chain and
//! links it with the relay chain.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags ──▶ commands ──▶ BridgeAdminContext ──▶ operations
//!                    │               │                    │
//!                    ▼               ▼                    ▼
//!                 config        storage (passphrase   blockchain
//!              (JSON file)      verifiers), wallet    (builder, confirmer,
//!                                                      RPC client)
//!                                                         │
//!                                       routing (chain ids, families)
//! ```
//!
//! One command per process. Exit code 1 with the error on stderr on failure.

use std::process::ExitCode;

use clap::Parser;

use bridge_admin::commands::{run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
