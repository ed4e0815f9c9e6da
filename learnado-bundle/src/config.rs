//! Packaging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where packaging reads its fixed inputs and writes bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingConfig {
    /// Site skeleton copied into every staging area.
    pub site_template_dir: PathBuf,
    /// Homepage document, staged as `content/_index.md`.
    pub homepage_path: PathBuf,
    /// Directory bundles are written to.
    pub output_dir: PathBuf,
    /// Replaces whitespace and path separators in course folder names.
    pub name_separator: String,
    pub renderer: RendererConfig,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            site_template_dir: PathBuf::from("hugo"),
            homepage_path: PathBuf::from("homepage.md"),
            output_dir: PathBuf::from("."),
            name_separator: "-".into(),
            renderer: RendererConfig::default(),
        }
    }
}

/// External static-site renderer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Rendered output, relative to the staging directory.
    pub output_subdir: PathBuf,
    pub timeout_secs: u64,
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "hugo".into(),
            args: Vec::new(),
            output_subdir: PathBuf::from("public"),
            timeout_secs: 300,
        }
    }
}
