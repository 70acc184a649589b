//! Compiled contract bytecode.

use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::hex;
use alloy::primitives::Bytes;

use crate::config::ContractRole;

/// Read a file holding hex text (optional 0x prefix, surrounding whitespace).
pub fn read_hex_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let raw = fs::read_to_string(path)?;
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is not hex: {}", path.display(), e),
        )
    })
}

/// Bytecode directory with one `<role>.bin` per deployable contract.
#[derive(Debug, Clone)]
pub struct ContractArtifacts {
    dir: PathBuf,
}

impl ContractArtifacts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Bytecode file for `role`; `None` for contracts this tool never deploys.
    pub fn path(&self, role: ContractRole) -> Option<PathBuf> {
        let file = match role {
            ContractRole::DataStore => "eccd.bin",
            ContractRole::Manager => "eccm.bin",
            ContractRole::ManagerProxy => "ccmp.bin",
            ContractRole::LockProxy => return None,
        };
        Some(self.dir.join(file))
    }

    /// Creation bytecode for `role`.
    pub fn bytecode(&self, role: ContractRole) -> std::io::Result<Bytes> {
        let path = self.path(role).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("{} is not deployed by this tool", role),
            )
        })?;
        let code = read_hex_file(&path)?;
        if code.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is empty", path.display()),
            ));
        }
        Ok(code.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_hex_variants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.hex");
        fs::write(&path, "0x6080\n").unwrap();
        assert_eq!(read_hex_file(&path).unwrap(), vec![0x60, 0x80]);

        fs::write(&path, "  deadbeef  ").unwrap();
        assert_eq!(read_hex_file(&path).unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);

        fs::write(&path, "xyz").unwrap();
        assert!(read_hex_file(&path).is_err());
    }

    #[test]
    fn test_bytecode_by_role() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("eccm.bin"), "6001").unwrap();
        fs::write(dir.path().join("ccmp.bin"), "").unwrap();
        let artifacts = ContractArtifacts::new(dir.path());

        assert_eq!(artifacts.bytecode(ContractRole::Manager).unwrap().as_ref(), &[0x60, 0x01]);
        assert!(artifacts.bytecode(ContractRole::ManagerProxy).is_err());
        assert!(artifacts.bytecode(ContractRole::DataStore).is_err());
    }

    #[test]
    fn test_lock_proxy_has_no_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lock_proxy.bin"), "6001").unwrap();
        let artifacts = ContractArtifacts::new(dir.path());

        assert_eq!(artifacts.path(ContractRole::LockProxy), None);
        assert_eq!(
            artifacts.path(ContractRole::DataStore),
            Some(dir.path().join("eccd.bin"))
        );
        let err = artifacts.bytecode(ContractRole::LockProxy).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::Unsupported);
    }
}
