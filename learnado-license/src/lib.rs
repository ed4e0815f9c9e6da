//! Licensing for Learnado.
//!
//! This module handles:
//! - Issuing single-use license keys for a course
//! - Registering a license key to a device, producing a permanent entitlement
//! - Revoking license keys that have not been redeemed yet
//!
//! # Design Principles
//!
//! - **Consume once**: a license is deleted when it is redeemed, so its
//!   existence is its unconsumed state. Redemption is a single store
//!   transaction; concurrent registrations of one key have exactly one winner.
//! - **Partial batches are visible**: batch issuance reports the keys it did
//!   create alongside the failure that stopped it.
//! - **Explicit store handle**: every component receives an
//!   `Arc<dyn RecordStore>` at construction.

mod error;
mod issuer;
mod registrar;

pub use error::{BatchIssueError, LicenseError, LicenseResult};
pub use issuer::LicenseIssuer;
pub use registrar::EntitlementRegistrar;
