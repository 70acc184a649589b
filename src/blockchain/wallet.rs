//! Admin keys and keystore loading.
//!
//! # Security
//! - Keys are decrypted from keystore files, never read from the config
//! - Keys are never logged or serialized; `Debug` shows the address only
//! - The passphrase store keeps verifiers, not passphrases

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::storage::PassphraseStore;

/// Passphrase the deployment keystores are created with.
pub const DEFAULT_ACCOUNT_PASSPHRASE: &str = "111111";

/// A signing key authorized for privileged bridge operations.
#[derive(Clone)]
pub struct AdminKey {
    signer: PrivateKeySigner,
}

impl AdminKey {
    /// Create a key from a hex-encoded private key (with or without 0x).
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;
        Ok(Self { signer })
    }

    pub fn from_signer(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet used to sign transaction requests.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }

    /// Uncompressed SEC1 public key (65 bytes, 0x04 prefix).
    pub fn public_key(&self) -> Vec<u8> {
        self.signer
            .credential()
            .verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminKey")
            .field("address", &self.address())
            .finish()
    }
}

/// Locate the keystore file of `address` inside `dir`.
///
/// Matches geth-style file names ending in the lowercase address first, then
/// falls back to the `address` field inside each JSON file.
pub fn find_keystore_file(dir: &Path, address: Address) -> BlockchainResult<PathBuf> {
    let needle = format!("{:x}", address);
    let entries = fs::read_dir(dir).map_err(|e| {
        BlockchainError::Wallet(format!("read keystore dir {}: {}", dir.display(), e))
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if name.ends_with(&needle) {
            return Ok(path);
        }
        candidates.push(path);
    }

    for path in candidates {
        if keystore_address(&path) == Some(address) {
            return Ok(path);
        }
    }

    Err(BlockchainError::Wallet(format!(
        "no keystore file for {} in {}",
        address,
        dir.display()
    )))
}

fn keystore_address(path: &Path) -> Option<Address> {
    let text = fs::read_to_string(path).ok()?;
    let json: serde_json::Value = serde_json::from_str(&text).ok()?;
    json.get("address")?.as_str()?.parse().ok()
}

/// Decrypt the keystore of `address` with `passphrase`.
pub fn load_account(
    store: &PassphraseStore,
    dir: &Path,
    address: Address,
    passphrase: &str,
) -> BlockchainResult<AdminKey> {
    if store.check(&address, passphrase) == Some(false) {
        return Err(BlockchainError::Wallet(format!(
            "passphrase for {} does not match the one recorded in the passphrase store",
            address
        )));
    }

    let path = find_keystore_file(dir, address)?;
    let key = decrypt(&path, passphrase)?;
    if key.address() != address {
        return Err(BlockchainError::Wallet(format!(
            "keystore {} holds {}, expected {}",
            path.display(),
            key.address(),
            address
        )));
    }

    if let Err(e) = store.remember(address, passphrase) {
        tracing::warn!(address = %address, error = %e, "Failed to persist passphrase verifier");
    }
    tracing::info!(address = %address, "Account loaded");
    Ok(key)
}

/// Decrypt every keystore file in `dir`, ordered by address.
pub fn load_account_dir(dir: &Path, passphrase: &str) -> BlockchainResult<Vec<AdminKey>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        BlockchainError::Wallet(format!("read keystore dir {}: {}", dir.display(), e))
    })?;

    let mut keys = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file() {
            keys.push(decrypt(&path, passphrase)?);
        }
    }
    if keys.is_empty() {
        return Err(BlockchainError::Wallet(format!(
            "no keystore files in {}",
            dir.display()
        )));
    }
    keys.sort_by_key(AdminKey::address);
    Ok(keys)
}

fn decrypt(path: &Path, passphrase: &str) -> BlockchainResult<AdminKey> {
    PrivateKeySigner::decrypt_keystore(path, passphrase)
        .map(AdminKey::from_signer)
        .map_err(|e| BlockchainError::Wallet(format!("decrypt {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (Anvil's first account)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_key_from_private_key() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(
            key.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        let prefixed = AdminKey::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(prefixed.address(), key.address());
    }

    #[test]
    fn test_invalid_private_key() {
        let result = AdminKey::from_private_key("invalid_key");
        assert!(result.unwrap_err().to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_debug_hides_key() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let shown = format!("{:?}", key);
        assert!(shown.contains("address"));
        assert!(!shown.contains(TEST_PRIVATE_KEY));
    }

    #[test]
    fn test_public_key_shape() {
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let pk = key.public_key();
        assert_eq!(pk.len(), 65);
        assert_eq!(pk[0], 0x04);
    }

    #[test]
    fn test_find_keystore_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let key = AdminKey::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let name = format!("UTC--2020-01-01T00-00-00.000Z--{:x}", key.address());
        fs::write(dir.path().join(&name), "{}").unwrap();
        fs::write(dir.path().join("other"), "{}").unwrap();

        let found = find_keystore_file(dir.path(), key.address()).unwrap();
        assert!(found.ends_with(name));
    }

    #[test]
    fn test_find_keystore_by_content() {
        let dir = tempfile::tempdir().unwrap();
        let address = Address::repeat_byte(0xab);
        let body = format!(r#"{{"address":"{:x}","version":3}}"#, address);
        fs::write(dir.path().join("admin.json"), body).unwrap();

        let found = find_keystore_file(dir.path(), address).unwrap();
        assert!(found.ends_with("admin.json"));
        assert!(find_keystore_file(dir.path(), Address::repeat_byte(0xcd)).is_err());
    }

    #[test]
    fn test_store_mismatch_rejected_before_decrypt() {
        let dir = tempfile::tempdir().unwrap();
        let store = PassphraseStore::new(None);
        let address = Address::repeat_byte(0x33);
        store.remember(address, DEFAULT_ACCOUNT_PASSPHRASE).unwrap();

        let err = load_account(&store, dir.path(), address, "wrong").unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }
}
