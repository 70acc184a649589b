//! Passphrase verifier store.
//!
//! Remembers, per account, a keccak verifier of the passphrase that last
//! unlocked its keystore file. A later load with a different passphrase is
//! rejected before the (slow) scrypt decryption runs. Passphrases themselves
//! are never written.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::{keccak256, Address, B256};
use dashmap::DashMap;

/// File name of the store inside its directory.
pub const STORE_FILE: &str = "passphrases.json";

/// A thread-safe, file-backed map of address → passphrase verifier.
#[derive(Clone, Default)]
pub struct PassphraseStore {
    inner: Arc<DashMap<Address, B256>>,
    persistence_path: Option<PathBuf>,
}

impl PassphraseStore {
    /// Create an empty store, persisted to `persistence_path` if given.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
        }
    }

    /// Open the store in `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORE_FILE);
        let store = Self::new(Some(path.clone()));
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let map: HashMap<Address, B256> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                store.inner.insert(k, v);
            }
            tracing::debug!(entries = store.inner.len(), "Loaded passphrase store");
        }
        Ok(store)
    }

    fn verifier(address: &Address, passphrase: &str) -> B256 {
        let mut preimage = Vec::with_capacity(20 + passphrase.len());
        preimage.extend_from_slice(address.as_slice());
        preimage.extend_from_slice(passphrase.as_bytes());
        keccak256(preimage)
    }

    /// `Some(true)` if `passphrase` matches the remembered verifier,
    /// `Some(false)` on mismatch, `None` if the address is unknown.
    pub fn check(&self, address: &Address, passphrase: &str) -> Option<bool> {
        self.inner
            .get(address)
            .map(|stored| *stored.value() == Self::verifier(address, passphrase))
    }

    /// Remember `passphrase` as the one that unlocks `address` and persist.
    pub fn remember(&self, address: Address, passphrase: &str) -> std::io::Result<()> {
        let verifier = Self::verifier(&address, passphrase);
        let previous = self.inner.insert(address, verifier);
        if previous != Some(verifier) {
            self.save()?;
        }
        Ok(())
    }

    /// Save to file.
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let writer = BufWriter::new(File::create(path)?);
            let map: HashMap<_, _> = self
                .inner
                .iter()
                .map(|r| (*r.key(), *r.value()))
                .collect();
            serde_json::to_writer_pretty(writer, &map)?;
            tracing::debug!(entries = map.len(), "Saved passphrase store");
        }
        Ok(())
    }
}
