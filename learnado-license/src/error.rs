//! Error types for the licensing module.

use learnado_storage::StorageError;
use learnado_types::{CourseId, LicenseId};
use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The course a license was requested for does not exist.
    #[error("invalid course: {0}")]
    InvalidCourse(CourseId),

    /// The license key is unknown, already redeemed, or revoked.
    #[error("invalid license: {0}")]
    InvalidLicense(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// A batch issuance that stopped early.
///
/// `issued` holds the licenses persisted before the failure. They are live
/// and redeemable; the batch is not rolled back.
#[derive(Debug, Error)]
#[error("issued {} of {requested} licenses: {source}", .issued.len())]
pub struct BatchIssueError {
    pub issued: Vec<LicenseId>,
    pub requested: usize,
    #[source]
    pub source: LicenseError,
}
