//! License issuance.

use crate::error::{BatchIssueError, LicenseError, LicenseResult};
use learnado_storage::RecordStore;
use learnado_types::{CourseId, License, LicenseId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates single-use licenses for existing courses.
#[derive(Clone)]
pub struct LicenseIssuer {
    store: Arc<dyn RecordStore>,
}

impl LicenseIssuer {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Issues one license for `course_id` and returns its key.
    ///
    /// Fails with [`LicenseError::InvalidCourse`] if the course does not
    /// exist at issue time. The course is not re-checked on redemption.
    pub fn issue_license(&self, course_id: &CourseId) -> LicenseResult<LicenseId> {
        if self.store.get_course(course_id)?.is_none() {
            return Err(LicenseError::InvalidCourse(*course_id));
        }

        let license = License::new(*course_id);
        self.store.save_license(&license)?;
        debug!("Issued license {} for course {course_id}", license.id);
        Ok(license.id)
    }

    /// Issues `count` licenses one after another.
    ///
    /// Stops at the first failure. Licenses created before the failure stay
    /// persisted and are returned in [`BatchIssueError::issued`].
    pub fn issue_licenses(
        &self,
        course_id: &CourseId,
        count: usize,
    ) -> Result<Vec<LicenseId>, BatchIssueError> {
        let mut issued = Vec::with_capacity(count);
        for _ in 0..count {
            match self.issue_license(course_id) {
                Ok(id) => issued.push(id),
                Err(source) => {
                    warn!(
                        "License batch for course {course_id} stopped after {} of {count}: {source}",
                        issued.len()
                    );
                    return Err(BatchIssueError {
                        issued,
                        requested: count,
                        source,
                    });
                }
            }
        }

        info!("Issued {count} licenses for course {course_id}");
        Ok(issued)
    }
}
