//! Error types for the service facade.

use learnado_bundle::BundleError;
use learnado_license::{BatchIssueError, LicenseError};
use learnado_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A request field is missing, mistyped or out of range.
    #[error("invalid request field `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    License(#[from] LicenseError),

    /// Batch issuance stopped early; the error carries the keys it created.
    #[error(transparent)]
    BatchIssue(#[from] BatchIssueError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
