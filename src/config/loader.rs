//! Configuration loading from and persisting to disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::ChainId;

/// Error type for configuration loading and chain resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("invalid chain id {0}")]
    UnknownChain(ChainId),

    #[error("chain {0} has no section in the config file")]
    MissingChainSection(ChainId),

    #[error("config section for chain {section} declares SideChainID {configured}")]
    ChainIdMismatch { section: ChainId, configured: ChainId },

    #[error("admin index {index} out of range, {len} admin accounts configured")]
    AdminIndexOutOfRange { index: usize, len: usize },

    #[error("keystore dir {0} is not exist")]
    MissingKeystore(PathBuf),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BridgeConfig =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Write the configuration back, pretty-printed with four-space indentation.
///
/// The file is replaced atomically so an interrupted write never leaves a
/// truncated config behind.
pub fn save_config(path: &Path, config: &BridgeConfig) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config
        .serialize(&mut ser)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let tmp = path.with_extension("json.tmp");
    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(&buf)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = written {
        if let Err(e) = fs::remove_file(&tmp) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temporary config");
            }
        }
        return Err(write_err(source));
    }

    tracing::debug!(path = %path.display(), "Config persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ChainConfig, ContractRole};
    use alloy::primitives::Address;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_save_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut cc = ChainConfig::new(ChainId::ETHEREUM, "eth", "http://localhost:8545");
        cc.record_deployment(ContractRole::DataStore, Address::repeat_byte(0x42));
        let config = BridgeConfig {
            keystore: dir.path().to_path_buf(),
            admin_account_list: vec![Address::repeat_byte(0x01)],
            ethereum: Some(cc),
            ..Default::default()
        };

        save_config(&path, &config).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"LevelDB\""));
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_failed_save_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        // a directory at the target makes the final rename fail
        fs::create_dir(&path).unwrap();

        let err = save_config(&path, &BridgeConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::UnknownChain(ChainId(99));
        assert_eq!(err.to_string(), "invalid chain id 99");

        let err = ConfigError::AdminIndexOutOfRange { index: 3, len: 2 };
        assert!(err.to_string().contains("out of range"));
    }
}
