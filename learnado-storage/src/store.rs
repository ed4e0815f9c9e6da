//! The persistence contract the licensing and packaging components rely on.

use crate::error::StorageResult;
use learnado_types::{
    Course, CourseId, Entitlement, EntitlementId, HardwareId, License, LicenseId,
};

/// Typed record storage.
///
/// Every method is atomic on its own; no cross-method transaction is implied.
/// The one multi-record transition the core needs, consuming a license, is
/// exposed as [`RecordStore::redeem_license`].
pub trait RecordStore: Send + Sync {
    // ── Courses (owned by the catalogue, read by the core) ──────────

    /// Inserts a new course.
    fn save_course(&self, course: &Course) -> StorageResult<()>;

    /// Looks up a course by id.
    fn get_course(&self, id: &CourseId) -> StorageResult<Option<Course>>;

    /// Replaces a course's name and content root. Returns false if absent.
    fn update_course(&self, course: &Course) -> StorageResult<bool>;

    /// Deletes a course. Returns false if absent.
    fn delete_course(&self, id: &CourseId) -> StorageResult<bool>;

    // ── Licenses ────────────────────────────────────────────────────

    /// Inserts a new license.
    fn save_license(&self, license: &License) -> StorageResult<()>;

    /// Looks up an unconsumed license by id.
    fn get_license(&self, id: &LicenseId) -> StorageResult<Option<License>>;

    /// Returns all unconsumed licenses for a course.
    fn licenses_for_course(&self, course_id: &CourseId) -> StorageResult<Vec<License>>;

    /// Compare-and-delete: removes the license if it still exists and
    /// reports whether this call removed it.
    fn delete_license(&self, id: &LicenseId) -> StorageResult<bool>;

    // ── Entitlements ────────────────────────────────────────────────

    /// Inserts an entitlement directly (catalogue migrations, fixtures).
    fn save_entitlement(&self, entitlement: &Entitlement) -> StorageResult<()>;

    /// Returns every entitlement bound to a device.
    fn entitlements_for_hardware(
        &self,
        hardware_id: &HardwareId,
    ) -> StorageResult<Vec<Entitlement>>;

    /// Returns true if the device is already entitled to the course.
    fn entitlement_exists(
        &self,
        course_id: &CourseId,
        hardware_id: &HardwareId,
    ) -> StorageResult<bool>;

    // ── Consume-once transition ─────────────────────────────────────

    /// Atomically consumes a license and binds it to a device.
    ///
    /// Deletes the license and inserts `Entitlement { entitlement_id,
    /// license.course_id, hardware_id }` in one transaction. Returns `None`
    /// without writing anything if the license does not exist (never issued,
    /// revoked, or already redeemed by a concurrent caller).
    fn redeem_license(
        &self,
        license_id: &LicenseId,
        entitlement_id: EntitlementId,
        hardware_id: &HardwareId,
    ) -> StorageResult<Option<Entitlement>>;
}
