//! The `Learnado` service facade.

use crate::config::LearnadoConfig;
use crate::error::CoreResult;
use crate::requests::{
    DownloadRequest, DownloadResponse, IssueLicensesRequest, IssueLicensesResponse,
    RegisterLicenseRequest, RegisterLicenseResponse, RevokeLicenseRequest, RevokeLicenseResponse,
};
use learnado_bundle::{ContentRenderer, HugoRenderer, PackagingConfig, PackagingPipeline};
use learnado_license::{EntitlementRegistrar, LicenseError, LicenseIssuer};
use learnado_storage::{RecordStore, SqliteStore};
use learnado_types::LicenseId;
use std::fs;
use std::sync::Arc;
use tracing::{info, warn};

/// One entry point per external action, all sharing one store handle.
pub struct Learnado {
    store: Arc<dyn RecordStore>,
    issuer: LicenseIssuer,
    registrar: EntitlementRegistrar,
    pipeline: PackagingPipeline,
}

impl Learnado {
    /// Opens the configured database and wires the Hugo renderer.
    pub fn open(config: &LearnadoConfig) -> CoreResult<Self> {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open(&config.database_path)?);
        let renderer = Arc::new(HugoRenderer::new(config.packaging.renderer.clone()));
        info!("Learnado service ready, database {}", config.database_path.display());
        Ok(Self::with_parts(store, renderer, config.packaging.clone()))
    }

    /// Wires the service from explicit parts.
    pub fn with_parts(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn ContentRenderer>,
        packaging: PackagingConfig,
    ) -> Self {
        Self {
            issuer: LicenseIssuer::new(Arc::clone(&store)),
            registrar: EntitlementRegistrar::new(Arc::clone(&store)),
            pipeline: PackagingPipeline::from_config(Arc::clone(&store), renderer, packaging),
            store,
        }
    }

    /// The shared record store, for the course catalogue.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn issue_licenses(&self, request: &IssueLicensesRequest) -> CoreResult<IssueLicensesResponse> {
        let keys = self.issuer.issue_licenses(&request.course_id, request.num)?;
        Ok(IssueLicensesResponse {
            license_keys: keys.iter().map(LicenseId::to_string).collect(),
        })
    }

    pub fn register_license(
        &self,
        request: &RegisterLicenseRequest,
    ) -> CoreResult<RegisterLicenseResponse> {
        let license_id = parse_license_key(&request.license_key)?;
        let entitlement = self.registrar.register(&license_id, &request.hardware_id)?;
        Ok(RegisterLicenseResponse::registered(entitlement))
    }

    pub fn revoke_license(&self, request: &RevokeLicenseRequest) -> CoreResult<RevokeLicenseResponse> {
        let license_id = parse_license_key(&request.license_key)?;
        self.registrar.revoke(&license_id)?;
        Ok(RevokeLicenseResponse {
            status: "License revoked",
        })
    }

    /// Packages a fresh bundle for the device and returns its bytes.
    ///
    /// The bundle file is deleted once read, whether or not the read worked.
    pub fn download(&self, request: &DownloadRequest) -> CoreResult<DownloadResponse> {
        let bundle = self.pipeline.package_for_device(&request.hardware_id)?;

        let read = fs::read(&bundle.path);
        if let Err(e) = fs::remove_file(&bundle.path) {
            warn!("Failed to remove bundle {}: {e}", bundle.path.display());
        }
        let bytes = read?;

        Ok(DownloadResponse {
            file_name: bundle.file_name,
            bytes,
            sha256: bundle.sha256,
        })
    }
}

/// A key that is not a well-formed id cannot name a license.
fn parse_license_key(key: &str) -> Result<LicenseId, LicenseError> {
    LicenseId::parse(key).map_err(|_| LicenseError::InvalidLicense(key.to_owned()))
}
