//! Cryptography for Learnado bundles.
//!
//! - Key derivation: SHA3-256 of a device's hardware id, no stored secret
//! - Sealing: AES-256-GCM with a fresh random nonce per bundle
//!
//! A sealed buffer is laid out as `nonce(12) || ciphertext || tag(16)`,
//! which is the format offline viewers expect.

mod cipher;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, open, seal, SealedData, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{derive_key, DerivedKey, KEY_SIZE};
