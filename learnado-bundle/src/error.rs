//! Error types for the bundle crate.

use learnado_crypto::CryptoError;
use learnado_storage::StorageError;
use learnado_types::CourseId;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    /// Staging, copying, rendering or walking the site failed.
    #[error("packaging failed: {0}")]
    Packaging(String),

    #[error("course {0} referenced by an entitlement does not exist")]
    MissingCourse(CourseId),

    #[error("renderer did not finish within {0:?}")]
    RenderTimeout(Duration),

    /// The pathmap stream is structurally invalid.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("compression error: {0}")]
    Compression(#[source] std::io::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BundleResult<T> = Result<T, BundleError>;
