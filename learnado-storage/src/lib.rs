//! Record storage for Learnado.
//!
//! Provides typed persistence for courses, licenses and entitlements behind
//! the [`RecordStore`] trait, with a SQLite implementation.
//!
//! # Architecture
//!
//! - Each operation is individually atomic
//! - License consumption goes through [`RecordStore::redeem_license`], a
//!   single transaction that deletes the license and inserts the entitlement,
//!   so a license can never yield two entitlements
//! - Callers hold the store as an explicit `Arc<dyn RecordStore>` handle

mod error;
mod sqlite;
mod store;

pub use error::{StorageError, StorageResult};
pub use sqlite::SqliteStore;
pub use store::RecordStore;
