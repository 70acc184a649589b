//! Bridge contract bindings.
//!
//! # Responsibilities
//! - ABI for the side-chain contracts (ECCD, ECCM, CCMP, lock proxy)
//! - ABI for the relay chain's side-chain manager and header-sync contracts
//! - Compiled bytecode loading for deployments
//!
//! # Design Decisions
//! - Calls are encoded here and sent through the transaction engine, so every
//!   write shares the same nonce, gas and confirmation handling

pub mod artifacts;

use alloy::sol;

pub use artifacts::{read_hex_file, ContractArtifacts};

sol! {
    /// Cross-chain data store.
    #[derive(Debug)]
    contract EthCrossChainData {
        function transferOwnership(address newOwner) external;
        function owner() external view returns (address);
    }

    /// Cross-chain manager.
    #[derive(Debug)]
    contract EthCrossChainManager {
        constructor(address eccd, uint64 chainId);
        function transferOwnership(address newOwner) external;
        function owner() external view returns (address);
        function initGenesisBlock(bytes rawHeader, bytes pubKeyList) external returns (bool);
    }

    /// Cross-chain manager proxy.
    #[derive(Debug)]
    contract EthCrossChainManagerProxy {
        constructor(address ethCrossChainManagerAddr);
        function transferOwnership(address newOwner) external;
        function owner() external view returns (address);
    }

    /// Lock proxy holding bound assets.
    #[derive(Debug)]
    contract LockProxy {
        function bindAssetHash(address fromAssetHash, uint64 toChainId, bytes toAssetHash) external returns (bool);
    }

    /// Relay-chain side-chain registry.
    #[derive(Debug)]
    interface ISideChainManager {
        function registerSideChain(uint64 chainID, uint64 router, string name, uint64 blocksToWait, bytes CCMCAddress, bytes extraInfo) external returns (bool);
        function approveRegisterSideChain(uint64 chainID) external returns (bool);
    }

    /// Relay-chain header synchronisation.
    #[derive(Debug)]
    interface IHeaderSync {
        function syncGenesisHeader(uint64 chainID, bytes genesisHeader) external returns (bool);
    }
}
