//! Device registration and license revocation.

use crate::error::{LicenseError, LicenseResult};
use learnado_storage::RecordStore;
use learnado_types::{CourseId, Entitlement, EntitlementId, HardwareId, LicenseId};
use std::sync::Arc;
use tracing::info;

/// Turns licenses into entitlements, or revokes them unused.
#[derive(Clone)]
pub struct EntitlementRegistrar {
    store: Arc<dyn RecordStore>,
}

impl EntitlementRegistrar {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Redeems `license_id` for the device `hardware_id`.
    ///
    /// The license is consumed and an entitlement to its course is created in
    /// one store transaction. A key that was never issued, was revoked, or
    /// was already redeemed (including by a concurrent caller) fails with
    /// [`LicenseError::InvalidLicense`]; these cases are indistinguishable.
    pub fn register(
        &self,
        license_id: &LicenseId,
        hardware_id: &HardwareId,
    ) -> LicenseResult<Entitlement> {
        let entitlement = self
            .store
            .redeem_license(license_id, EntitlementId::new(), hardware_id)?
            .ok_or_else(|| LicenseError::InvalidLicense(license_id.to_string()))?;

        info!(
            "Registered license {license_id}: course {} on device {hardware_id}",
            entitlement.course_id
        );
        Ok(entitlement)
    }

    /// Deletes an unredeemed license.
    ///
    /// Entitlements already created from other licenses are untouched.
    pub fn revoke(&self, license_id: &LicenseId) -> LicenseResult<()> {
        if !self.store.delete_license(license_id)? {
            return Err(LicenseError::InvalidLicense(license_id.to_string()));
        }
        info!("Revoked license {license_id}");
        Ok(())
    }

    /// Returns every entitlement bound to a device.
    pub fn entitlements_for(&self, hardware_id: &HardwareId) -> LicenseResult<Vec<Entitlement>> {
        Ok(self.store.entitlements_for_hardware(hardware_id)?)
    }

    /// Returns true if the device already holds an entitlement to the course.
    ///
    /// Callers retrying a failed `register` check this first, since a
    /// redeemed key cannot be redeemed again.
    pub fn is_entitled(&self, course_id: &CourseId, hardware_id: &HardwareId) -> LicenseResult<bool> {
        Ok(self.store.entitlement_exists(course_id, hardware_id)?)
    }
}
