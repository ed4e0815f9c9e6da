//! Packaging pipeline: collect → encode → compress → seal → write.

use crate::archive::{self, PathMap};
use crate::builder::BundleBuilder;
use crate::compress::{compress, decompress};
use crate::config::PackagingConfig;
use crate::error::BundleResult;
use crate::render::ContentRenderer;
use learnado_crypto::{derive_key, open, seal};
use learnado_storage::RecordStore;
use learnado_types::HardwareId;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

/// File extension of written bundles.
pub const BUNDLE_EXTENSION: &str = "pmap";

/// Receipt for a bundle written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedBundle {
    /// `<uuid>.pmap`, unique per call.
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Hex SHA-256 of the sealed file.
    pub sha256: String,
}

pub struct PackagingPipeline {
    builder: BundleBuilder,
    output_dir: PathBuf,
}

impl PackagingPipeline {
    pub fn new(builder: BundleBuilder, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            builder,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn ContentRenderer>,
        config: PackagingConfig,
    ) -> Self {
        let output_dir = config.output_dir.clone();
        Self::new(BundleBuilder::new(store, renderer, config), output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Builds, seals and writes a fresh bundle for the device.
    ///
    /// Any failing stage aborts the pipeline. The bundle is written to a
    /// temporary file in the output directory and renamed into place last,
    /// so no file appears under the final name unless every stage succeeded.
    pub fn package_for_device(&self, hardware_id: &HardwareId) -> BundleResult<PackagedBundle> {
        let map = self.builder.collect_content(hardware_id)?;

        let encoded = archive::encode(&map);
        let compressed = compress(&encoded)?;
        debug!(
            "Encoded {} entries: {} bytes, {} compressed",
            map.len(),
            encoded.len(),
            compressed.len()
        );

        let key = derive_key(hardware_id.as_str());
        let sealed = seal(&key, &compressed)?;

        let file_name = format!("{}.{BUNDLE_EXTENSION}", Uuid::new_v4());
        let path = self.output_dir.join(&file_name);
        fs::create_dir_all(&self.output_dir)?;

        let mut tmp = NamedTempFile::new_in(&self.output_dir)?;
        tmp.write_all(&sealed)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        let bundle = PackagedBundle {
            file_name,
            path,
            size: sealed.len() as u64,
            sha256: hex::encode(Sha256::digest(&sealed)),
        };
        info!(
            "Packaged bundle {} for device {hardware_id} ({} bytes)",
            bundle.file_name, bundle.size
        );
        Ok(bundle)
    }
}

/// Opens a sealed bundle with the device's derived key.
pub fn open_bundle(sealed: &[u8], hardware_id: &HardwareId) -> BundleResult<PathMap> {
    let key = derive_key(hardware_id.as_str());
    let compressed = open(&key, sealed)?;
    let encoded = decompress(&compressed)?;
    archive::decode(&encoded)
}
