//! Command-line surface and dispatch.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};

use crate::config::load_config;
use crate::context::{BridgeAdminContext, ContextOptions};
use crate::error::{BridgeError, BridgeResult};
use crate::observability::init_logging;
use crate::routing::ChainId;

#[derive(Debug, Parser)]
#[command(name = "bridge-admin")]
#[command(about = "Deploy and administer cross-chain bridge contracts", long_about = None)]
pub struct Cli {
    /// Log level: 0 trace, 1 debug, 2 info, 3 warn, 4/5 error, 6 off
    #[arg(long, global = true, default_value_t = 1)]
    pub loglevel: u8,

    /// Path of the JSON configuration file
    #[arg(long, global = true, default_value = "./config.json")]
    pub cliconfig: PathBuf,

    /// Side chain to operate on
    #[arg(long, global = true, default_value_t = 2)]
    pub chain: u64,

    /// Index into the admin account list
    #[arg(long, global = true, default_value_t = 0)]
    pub admin: usize,

    /// Gas price floor in gwei
    #[arg(long = "addGas", global = true, default_value_t = 0)]
    pub add_gas: u64,

    /// Epoch height for chains whose genesis header the operator picks
    #[arg(long, global = true, default_value_t = 0)]
    pub epoch: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deploy the cross-chain data store
    #[command(name = "deployECCD")]
    DeployEccd,
    /// Deploy the cross-chain manager
    #[command(name = "deployECCM")]
    DeployEccm,
    /// Deploy the cross-chain manager proxy
    #[command(name = "deployCCMP")]
    DeployCcmp,
    /// Bind a token on this chain to its counterpart on another chain
    #[command(name = "bindToken")]
    BindToken {
        #[arg(long)]
        asset: Address,
        #[arg(long = "dstChain")]
        dst_chain: u64,
        #[arg(long = "dstAsset")]
        dst_asset: Address,
    },
    /// Transfer data store ownership to the manager
    #[command(name = "transferECCDOwnership")]
    TransferEccdOwnership,
    /// Transfer manager ownership to the manager proxy
    #[command(name = "transferECCMOwnership")]
    TransferEccmOwnership,
    /// Transfer manager proxy ownership to an account
    #[command(name = "transferCCMPOwnership")]
    TransferCcmpOwnership {
        #[arg(long)]
        owner: Address,
    },
    /// Show the owner of every deployed contract
    #[command(name = "owners")]
    Owners,
    /// Register the side chain on the relay chain
    #[command(name = "registerSideChain")]
    RegisterSideChain,
    /// Approve the side chain registration with every relay validator
    #[command(name = "approveSideChain")]
    ApproveSideChain,
    /// Sync the side chain genesis header to the relay chain
    #[command(name = "syncSideGenesis")]
    SyncSideGenesis {
        /// Hex-encoded header to use instead of fetching one
        #[arg(long)]
        hexfile: Option<PathBuf>,
    },
    /// Sync the relay chain genesis header to the side chain
    #[command(name = "syncPolyGenesis")]
    SyncPolyGenesis,
    /// Transfer native coin
    #[command(name = "transferNative")]
    TransferNative {
        /// Sender, defaults to the admin account
        #[arg(long)]
        from: Option<Address>,
        #[arg(long)]
        to: Address,
        /// Amount in wei
        #[arg(long)]
        amount: U256,
    },
    /// Show native coin balance
    #[command(name = "nativeBalance")]
    NativeBalance {
        /// Account, defaults to the admin account
        #[arg(long)]
        from: Option<Address>,
    },
    /// Show chain ids and check an owner keystore
    #[command(name = "env")]
    Env {
        /// Account, defaults to the admin account
        #[arg(long)]
        owner: Option<Address>,
    },
}

/// Load config, start logging, build the context and run one command.
pub async fn run(cli: Cli) -> BridgeResult<()> {
    init_logging(cli.loglevel).map_err(BridgeError::Usage)?;
    let config = load_config(&cli.cliconfig)?;
    tracing::debug!(path = %cli.cliconfig.display(), "Configuration loaded");

    let options = ContextOptions {
        config_path: cli.cliconfig.clone(),
        chain: ChainId(cli.chain),
        admin_index: cli.admin,
        add_gas_gwei: cli.add_gas,
    };
    let mut ctx = BridgeAdminContext::establish(&options, config).await?;
    dispatch(&mut ctx, cli.command, cli.epoch).await
}

/// Run `command` against an established context.
pub async fn dispatch(ctx: &mut BridgeAdminContext, command: Command, epoch: u64) -> BridgeResult<()> {
    match command {
        Command::DeployEccd => {
            ctx.deploy_data_store().await?;
        }
        Command::DeployEccm => {
            ctx.deploy_manager().await?;
        }
        Command::DeployCcmp => {
            ctx.deploy_manager_proxy().await?;
        }
        Command::BindToken {
            asset,
            dst_chain,
            dst_asset,
        } => {
            ctx.bind_asset(asset, ChainId(dst_chain), dst_asset).await?;
        }
        Command::TransferEccdOwnership => {
            ctx.transfer_data_store_ownership().await?;
        }
        Command::TransferEccmOwnership => {
            ctx.transfer_manager_ownership().await?;
        }
        Command::TransferCcmpOwnership { owner } => {
            ctx.transfer_manager_proxy_ownership(owner).await?;
        }
        Command::Owners => {
            let owners = ctx.owners().await?;
            print!("{}", owners);
        }
        Command::RegisterSideChain => {
            ctx.register_side_chain().await?;
        }
        Command::ApproveSideChain => {
            ctx.approve_side_chain().await?;
        }
        Command::SyncSideGenesis { hexfile } => {
            ctx.sync_side_genesis(hexfile.as_deref(), epoch).await?;
        }
        Command::SyncPolyGenesis => {
            ctx.sync_poly_genesis().await?;
        }
        Command::TransferNative { from, to, amount } => {
            ctx.transfer_native(from, to, amount).await?;
        }
        Command::NativeBalance { from } => {
            let owner = from.unwrap_or_else(|| ctx.admin().address());
            let balance = ctx.native_balance(owner).await?;
            println!("{} {}", owner, balance);
        }
        Command::Env { owner } => {
            let owner = owner.unwrap_or_else(|| ctx.admin().address());
            let report = ctx.env_report(owner)?;
            print!("{}", report);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_defaults() {
        let cli = Cli::try_parse_from(["bridge-admin", "deployECCD"]).unwrap();
        assert_eq!(cli.loglevel, 1);
        assert_eq!(cli.cliconfig, PathBuf::from("./config.json"));
        assert_eq!(cli.chain, 2);
        assert_eq!(cli.admin, 0);
        assert_eq!(cli.add_gas, 0);
        assert!(matches!(cli.command, Command::DeployEccd));
    }

    #[test]
    fn test_bind_token_flags() {
        let cli = Cli::try_parse_from([
            "bridge-admin",
            "--chain",
            "6",
            "--addGas",
            "3",
            "bindToken",
            "--asset",
            "0x0000000000000000000000000000000000000001",
            "--dstChain",
            "2",
            "--dstAsset",
            "0x0000000000000000000000000000000000000002",
        ])
        .unwrap();
        assert_eq!(cli.chain, 6);
        assert_eq!(cli.add_gas, 3);
        match cli.command {
            Command::BindToken { dst_chain, dst_asset, .. } => {
                assert_eq!(dst_chain, 2);
                assert_eq!(dst_asset, Address::with_last_byte(2));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_transfer_native_amount() {
        let cli = Cli::try_parse_from([
            "bridge-admin",
            "transferNative",
            "--to",
            "0x0000000000000000000000000000000000000003",
            "--amount",
            "1000000000000000000",
        ])
        .unwrap();
        match cli.command {
            Command::TransferNative { from, amount, .. } => {
                assert!(from.is_none());
                assert_eq!(amount, U256::from(10u64).pow(U256::from(18u64)));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["bridge-admin", "syncSideGenesis", "--epoch", "400", "--chain", "12"])
            .unwrap();
        assert_eq!(cli.epoch, 400);
        assert_eq!(cli.chain, 12);
    }
}
