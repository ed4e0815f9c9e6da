//! Shared test helpers for license tests.

#![allow(dead_code)]

use learnado_license::{EntitlementRegistrar, LicenseIssuer};
use learnado_storage::{RecordStore, SqliteStore};
use learnado_types::{Course, HardwareId};
use std::sync::Arc;

pub struct Fixture {
    pub store: Arc<dyn RecordStore>,
    pub issuer: LicenseIssuer,
    pub registrar: EntitlementRegistrar,
}

/// In-memory store with an issuer and registrar sharing it.
pub fn fixture() -> Fixture {
    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    Fixture {
        issuer: LicenseIssuer::new(Arc::clone(&store)),
        registrar: EntitlementRegistrar::new(Arc::clone(&store)),
        store,
    }
}

/// Saves a course with the given name and returns it.
pub fn add_course(store: &Arc<dyn RecordStore>, name: &str) -> Course {
    let course = Course::new(name, format!("/srv/courses/{name}"));
    store.save_course(&course).unwrap();
    course
}

pub fn hw(s: &str) -> HardwareId {
    HardwareId::new(s).unwrap()
}
