//! Core type definitions for Learnado.
//!
//! This crate defines the identifiers and persisted records shared by every
//! other crate in the workspace:
//! - Course, License and Entitlement identifiers (UUID v4)
//! - Device hardware identifiers
//! - The `Course`, `License` and `Entitlement` records
//!
//! Nothing here touches storage or the filesystem.

mod ids;
mod record;

pub use ids::{CourseId, EntitlementId, HardwareId, LicenseId};
pub use record::{Course, Entitlement, License};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid hardware id: {0}")]
    InvalidHardwareId(String),
}
