//! Bundle content collection: stage, render, and read back the site.

use crate::archive::PathMap;
use crate::config::PackagingConfig;
use crate::error::{BundleError, BundleResult};
use crate::render::ContentRenderer;
use learnado_storage::RecordStore;
use learnado_types::{Course, CourseId, HardwareId};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Staged folder that holds course content inside the site.
const CONTENT_DIR: &str = "content";
/// Homepage document name within [`CONTENT_DIR`].
const HOMEPAGE_NAME: &str = "_index.md";

/// Replaces whitespace and path separators in a course name with `separator`.
///
/// ```
/// use learnado_bundle::normalize_course_name;
/// assert_eq!(normalize_course_name("Intro to Go", "-"), "Intro-to-Go");
/// assert_eq!(normalize_course_name("C/C++ Basics", "_"), "C_C++_Basics");
/// ```
pub fn normalize_course_name(name: &str, separator: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            out.push_str(separator);
        } else {
            out.push(c);
        }
    }
    out
}

/// Builds the rendered content map for a device.
pub struct BundleBuilder {
    store: Arc<dyn RecordStore>,
    renderer: Arc<dyn ContentRenderer>,
    config: PackagingConfig,
}

impl BundleBuilder {
    pub fn new(
        store: Arc<dyn RecordStore>,
        renderer: Arc<dyn ContentRenderer>,
        config: PackagingConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            config,
        }
    }

    pub fn config(&self) -> &PackagingConfig {
        &self.config
    }

    /// Renders every course the device is entitled to and returns the
    /// rendered tree as a path map.
    ///
    /// The staging directory is removed on every exit path.
    pub fn collect_content(&self, hardware_id: &HardwareId) -> BundleResult<PathMap> {
        let courses = self.resolve_courses(hardware_id)?;

        let staging = tempfile::Builder::new()
            .prefix("learnado-")
            .tempdir()
            .map_err(|e| BundleError::Packaging(format!("creating staging area: {e}")))?;
        debug!("Staging {} courses in {}", courses.len(), staging.path().display());

        self.stage(staging.path(), &courses)?;
        let output = self.renderer.render(staging.path())?;
        let map = read_tree(&output)?;

        info!(
            "Collected {} entries for device {hardware_id} ({} courses)",
            map.len(),
            courses.len()
        );
        Ok(map)
    }

    /// Distinct courses behind the device's entitlements, in id order.
    fn resolve_courses(&self, hardware_id: &HardwareId) -> BundleResult<Vec<Course>> {
        let course_ids: BTreeSet<CourseId> = self
            .store
            .entitlements_for_hardware(hardware_id)?
            .into_iter()
            .map(|e| e.course_id)
            .collect();

        if course_ids.is_empty() {
            warn!("Device {hardware_id} has no entitlements, bundle will hold the homepage only");
        }

        course_ids
            .into_iter()
            .map(|id| self.store.get_course(&id)?.ok_or(BundleError::MissingCourse(id)))
            .collect()
    }

    fn stage(&self, staging: &Path, courses: &[Course]) -> BundleResult<()> {
        copy_tree(&self.config.site_template_dir, staging)?;

        let content = staging.join(CONTENT_DIR);
        fs::create_dir_all(&content).map_err(|e| packaging("creating content dir", e))?;

        let mut folders: BTreeSet<String> = BTreeSet::new();
        for course in courses {
            let base = normalize_course_name(&course.name, &self.config.name_separator);
            if !is_plain_segment(&base) {
                return Err(BundleError::Packaging(format!(
                    "course {} name {:?} is not usable as a folder",
                    course.id, course.name
                )));
            }
            let folder = unique_folder(base, course, &self.config.name_separator, &folders);
            folders.insert(folder.clone());

            let dest = content.join(&folder);
            fs::create_dir_all(&dest).map_err(|e| packaging("creating course dir", e))?;
            copy_tree(&course.content_root, &dest)?;
            debug!("Staged course {} as {folder}", course.id);
        }

        fs::copy(&self.config.homepage_path, content.join(HOMEPAGE_NAME)).map_err(|e| {
            packaging(
                &format!("copying homepage {}", self.config.homepage_path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

/// Returns `base` unless an earlier course already took it, in which case
/// the first eight characters of the course id are appended, followed by a
/// counter if that name is taken too.
fn unique_folder(
    base: String,
    course: &Course,
    separator: &str,
    taken: &BTreeSet<String>,
) -> String {
    if !taken.contains(&base) {
        return base;
    }

    // Hyphenated uuid text is ASCII.
    let id = course.id.to_string();
    let short = &id[..8];
    let mut folder = format!("{base}{separator}{short}");
    let mut n = 1u32;
    while taken.contains(&folder) {
        n += 1;
        folder = format!("{base}{separator}{short}{separator}{n}");
    }
    warn!(
        "Course {} name {:?} collides with another course folder, staged as {folder}",
        course.id, course.name
    );
    folder
}

fn packaging(context: &str, err: impl std::fmt::Display) -> BundleError {
    BundleError::Packaging(format!("{context}: {err}"))
}

/// A single normal path component (no `.`, `..`, root or separators).
fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Recursively copies the contents of `src` into `dst`.
fn copy_tree(src: &Path, dst: &Path) -> BundleResult<()> {
    if !src.is_dir() {
        return Err(BundleError::Packaging(format!(
            "{} is not a directory",
            src.display()
        )));
    }

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| packaging(&format!("walking {}", src.display()), e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| packaging("resolving copy target", e))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| packaging(&format!("creating {}", target.display()), e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| packaging(&format!("creating {}", parent.display()), e))?;
            }
            fs::copy(entry.path(), &target)
                .map_err(|e| packaging(&format!("copying {}", entry.path().display()), e))?;
        }
    }
    Ok(())
}

/// Reads a rendered tree into a path map keyed by `/`-joined relative paths.
/// Directories are recorded with empty values; the root itself is omitted.
fn read_tree(root: &Path) -> BundleResult<PathMap> {
    let mut map = PathMap::new();

    for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| packaging(&format!("walking {}", root.display()), e))?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| packaging("resolving output path", e))?;

        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str().ok_or_else(|| {
                BundleError::Packaging(format!("non-UTF-8 path {}", relative.display()))
            })?;
            segments.push(segment);
        }
        let key = segments.join("/");

        let value = if entry.file_type().is_dir() {
            Vec::new()
        } else {
            fs::read(entry.path())
                .map_err(|e| packaging(&format!("reading {}", entry.path().display()), e))?
        };
        map.insert(key, value);
    }
    Ok(map)
}
