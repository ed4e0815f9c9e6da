//! Persisted records.
//!
//! A `License` has no "consumed" flag: its existence is the unconsumed state.
//! Registration deletes it and creates an `Entitlement`, which is never
//! mutated or removed afterwards.

use crate::ids::{CourseId, EntitlementId, HardwareId, LicenseId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A course as published by the course catalogue.
///
/// The core only reads courses; creation and edits belong to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Display name, also used (normalized) as the course's folder in bundles.
    pub name: String,
    /// Root of the course's content tree on the shared filesystem.
    pub content_root: PathBuf,
}

impl Course {
    /// Creates a course record with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, content_root: impl Into<PathBuf>) -> Self {
        Self {
            id: CourseId::new(),
            name: name.into(),
            content_root: content_root.into(),
        }
    }
}

/// An unconsumed right to activate one device for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: LicenseId,
    pub course_id: CourseId,
}

impl License {
    /// Creates a license for the given course with a fresh identifier.
    #[must_use]
    pub fn new(course_id: CourseId) -> Self {
        Self {
            id: LicenseId::new(),
            course_id,
        }
    }
}

/// A permanent binding of one device to one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: EntitlementId,
    pub course_id: CourseId,
    pub hardware_id: HardwareId,
}
