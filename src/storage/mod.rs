//! Local persistent state besides the config file.

pub mod passphrase;

pub use passphrase::PassphraseStore;
