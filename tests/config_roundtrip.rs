//! Config file persistence and chain resolution.

use alloy::primitives::{address, Address};

use bridge_admin::config::{load_config, save_config, ConfigError, ContractRole};
use bridge_admin::routing::ChainId;

mod common;

#[test]
fn test_round_trip_preserves_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = common::test_config(dir.path());

    let eth = config.resolve_mut(ChainId::ETHEREUM).unwrap();
    eth.record_deployment(
        ContractRole::DataStore,
        address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1"),
    );
    eth.record_deployment(ContractRole::LockProxy, Address::ZERO);

    save_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded, config);

    let eth = loaded.resolve(ChainId::ETHEREUM).unwrap();
    assert_eq!(
        eth.address(ContractRole::DataStore),
        Some(address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1"))
    );
    assert_eq!(eth.address(ContractRole::Manager), None);
    assert_eq!(eth.address(ContractRole::LockProxy), Some(Address::ZERO));
    assert_eq!(eth.deployed(ContractRole::LockProxy), None);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n    \"LevelDB\""));
    assert!(text.contains("\"ECCM\": \"\""));
}

#[test]
fn test_resolve_every_side_chain() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::test_config(dir.path());

    for id in ChainId::SIDE_CHAINS {
        assert_eq!(config.resolve(id).unwrap().side_chain_id, id);
    }
    for id in [ChainId::POLY, ChainId::ONTOLOGY, ChainId::NEO, ChainId::O3, ChainId(1000)] {
        assert!(matches!(config.resolve(id), Err(ConfigError::UnknownChain(_))));
    }
}

#[test]
fn test_missing_file_is_typed() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_persist_keeps_hand_written_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config(&path, &common::test_config(dir.path())).unwrap();

    let lowercase = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";
    let text = std::fs::read_to_string(&path)
        .unwrap()
        .replacen("\"LockProxy\": \"\"", &format!("\"LockProxy\": \"{}\"", lowercase), 1)
        .replacen("\"CCMP\": \"\"", "\"CCMP\": \"0xnothex\"", 1);
    std::fs::write(&path, text).unwrap();

    let mut config = load_config(&path).unwrap();
    let eth = config.resolve_mut(ChainId::ETHEREUM).unwrap();
    assert_eq!(eth.deployed(ContractRole::ManagerProxy), None);
    eth.record_deployment(
        ContractRole::DataStore,
        address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1"),
    );
    save_config(&path, &config).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains(&format!("\"LockProxy\": \"{}\"", lowercase)));
    assert!(text.contains("\"CCMP\": \"0xnothex\""));
    let eth = load_config(&path).unwrap();
    let eth = eth.resolve(ChainId::ETHEREUM).unwrap();
    assert_eq!(
        eth.deployed(ContractRole::LockProxy),
        Some(address!("abcdefabcdefabcdefabcdefabcdefabcdefabcd"))
    );
}
