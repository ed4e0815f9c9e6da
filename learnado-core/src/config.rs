//! Service configuration, read from `learnado.toml`.

use crate::error::{CoreError, CoreResult};
use learnado_bundle::PackagingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Top-level configuration. Every field has a default, so an empty file is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnadoConfig {
    /// SQLite database holding courses, licenses and entitlements.
    pub database_path: PathBuf,
    pub packaging: PackagingConfig,
}

impl Default for LearnadoConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("learnado.db"),
            packaging: PackagingConfig::default(),
        }
    }
}

impl LearnadoConfig {
    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates TOML configuration text.
    pub fn from_toml_str(contents: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        let renderer = &self.packaging.renderer;
        if renderer.timeout_secs == 0 {
            return Err(CoreError::Config(
                "packaging.renderer.timeout_secs must be at least 1".into(),
            ));
        }
        if renderer.program.trim().is_empty() {
            return Err(CoreError::Config("packaging.renderer.program is empty".into()));
        }
        if self.packaging.name_separator.is_empty() {
            return Err(CoreError::Config("packaging.name_separator is empty".into()));
        }
        Ok(())
    }
}
