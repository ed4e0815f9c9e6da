//! Shared fixtures for bundle tests: a site template, course trees on disk,
//! and renderers that stand in for Hugo.

#![allow(dead_code)]

use learnado_bundle::{BundleError, BundleResult, ContentRenderer, PackagingConfig};
use learnado_storage::{RecordStore, SqliteStore};
use learnado_types::{Course, Entitlement, EntitlementId, HardwareId};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Copies `staging/content` to `staging/public`, recording each staging path.
#[derive(Default)]
pub struct CopyRenderer {
    pub seen: Mutex<Vec<PathBuf>>,
}

impl ContentRenderer for CopyRenderer {
    fn render(&self, staging: &Path) -> BundleResult<PathBuf> {
        self.seen.lock().unwrap().push(staging.to_path_buf());

        let src = staging.join("content");
        let out = staging.join("public");
        for entry in WalkDir::new(&src) {
            let entry = entry.map_err(|e| BundleError::Packaging(e.to_string()))?;
            let target = out.join(entry.path().strip_prefix(&src).unwrap());
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(out)
    }
}

/// Always fails, recording the staging path it was given.
#[derive(Default)]
pub struct FailingRenderer {
    pub seen: Mutex<Vec<PathBuf>>,
}

impl ContentRenderer for FailingRenderer {
    fn render(&self, staging: &Path) -> BundleResult<PathBuf> {
        self.seen.lock().unwrap().push(staging.to_path_buf());
        Err(BundleError::Packaging("renderer exploded".into()))
    }
}

/// Filesystem and store for one packaging scenario.
pub struct Site {
    pub root: TempDir,
    pub store: Arc<dyn RecordStore>,
    pub config: PackagingConfig,
}

impl Site {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let template = root.path().join("hugo");
        fs::create_dir_all(template.join("layouts")).unwrap();
        fs::write(template.join("hugo.toml"), "title = 'Learnado'\n").unwrap();
        fs::write(template.join("layouts/index.html"), "<main/>").unwrap();

        let homepage = root.path().join("homepage.md");
        fs::write(&homepage, "# Welcome\n").unwrap();

        let config = PackagingConfig {
            site_template_dir: template,
            homepage_path: homepage,
            output_dir: root.path().join("out"),
            ..PackagingConfig::default()
        };

        Self {
            root,
            store: Arc::new(SqliteStore::open_in_memory().unwrap()),
            config,
        }
    }

    /// Creates a course whose content tree holds the given files.
    pub fn add_course(&self, name: &str, files: &[(&str, &str)]) -> Course {
        let dir = self.root.path().join("courses").join(name.replace(' ', "_"));
        fs::create_dir_all(&dir).unwrap();
        for (rel, body) in files {
            let path = dir.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        let course = Course::new(name, dir);
        self.store.save_course(&course).unwrap();
        course
    }

    pub fn entitle(&self, course: &Course, hardware_id: &HardwareId) {
        self.store
            .save_entitlement(&Entitlement {
                id: EntitlementId::new(),
                course_id: course.id,
                hardware_id: hardware_id.clone(),
            })
            .unwrap();
    }

    pub fn output_files(&self) -> Vec<PathBuf> {
        match fs::read_dir(&self.config.output_dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn hw(s: &str) -> HardwareId {
    HardwareId::new(s).unwrap()
}
