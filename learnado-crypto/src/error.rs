//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Ciphertext was tampered with, truncated, or sealed under another key.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailure,

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Sealed input is too short to contain a nonce and tag.
    #[error("sealed data truncated: expected at least {expected_at_least} bytes, got {actual}")]
    Truncated {
        expected_at_least: usize,
        actual: usize,
    },
}
