use learnado_bundle::{open_bundle, BundleError, BundleResult, ContentRenderer, PackagingConfig};
use learnado_core::{
    CoreError, DownloadRequest, IssueLicensesRequest, Learnado, LearnadoConfig,
    RegisterLicenseRequest, Request, RevokeLicenseRequest,
};
use learnado_crypto::CryptoError;
use learnado_license::LicenseError;
use learnado_storage::{RecordStore, SqliteStore};
use learnado_types::{Course, CourseId, HardwareId};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Publishes `content/` as the rendered site.
struct CopyRenderer;

impl ContentRenderer for CopyRenderer {
    fn render(&self, staging: &Path) -> BundleResult<PathBuf> {
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

struct Env {
    dir: TempDir,
    service: Learnado,
    packaging: PackagingConfig,
}

fn env() -> Env {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("hugo")).unwrap();
    fs::write(dir.path().join("hugo/hugo.toml"), "title = 'x'\n").unwrap();
    fs::write(dir.path().join("homepage.md"), "# Home\n").unwrap();

    let packaging = PackagingConfig {
        site_template_dir: dir.path().join("hugo"),
        homepage_path: dir.path().join("homepage.md"),
        output_dir: dir.path().join("out"),
        ..PackagingConfig::default()
    };
    let store = Arc::new(SqliteStore::open(dir.path().join("learnado.db")).unwrap());
    let service = Learnado::with_parts(store, Arc::new(CopyRenderer), packaging.clone());
    Env {
        dir,
        service,
        packaging,
    }
}

impl Env {
    fn add_course(&self, name: &str, lesson: &str) -> Course {
        let root = self.dir.path().join("courses").join(name.replace(' ', "_"));
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("lesson.md"), lesson).unwrap();
        let course = Course::new(name, root);
        self.service.store().save_course(&course).unwrap();
        course
    }

    fn issue(&self, course: &Course, num: &str) -> Vec<String> {
        let body = format!(r#"{{"courseID":"{}","num":"{num}"}}"#, course.id);
        let request = IssueLicensesRequest::from_json(&body).unwrap();
        self.service.issue_licenses(&request).unwrap().license_keys
    }

    fn register(&self, key: &str, hw: &str) -> Result<(), CoreError> {
        let request = RegisterLicenseRequest {
            license_key: key.to_owned(),
            hardware_id: HardwareId::new(hw).unwrap(),
        };
        self.service.register_license(&request).map(|_| ())
    }

    fn leftover_bundles(&self) -> usize {
        fs::read_dir(&self.packaging.output_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

#[test]
fn issue_register_download_end_to_end() {
    let env = env();
    let go = env.add_course("Intro to Go", "# Go");
    let keys = env.issue(&go, "2");
    assert_eq!(keys.len(), 2);

    env.register(&keys[0], "device-A").unwrap();

    let download = env
        .service
        .download(&DownloadRequest::from_json(r#"{"hardwareID":"device-A"}"#).unwrap())
        .unwrap();
    assert!(download.file_name.ends_with(".pmap"));
    assert_eq!(env.leftover_bundles(), 0);

    let map = open_bundle(&download.bytes, &HardwareId::new("device-A").unwrap()).unwrap();
    assert_eq!(map["Intro-to-Go/lesson.md"], b"# Go");
    assert_eq!(map["_index.md"], b"# Home\n");

    let err = open_bundle(&download.bytes, &HardwareId::new("device-B").unwrap()).unwrap_err();
    assert!(matches!(err, BundleError::Crypto(CryptoError::AuthenticationFailure)));
}

#[test]
fn key_is_single_use_across_devices() {
    let env = env();
    let go = env.add_course("Go", "# Go");
    let key = env.issue(&go, "1").remove(0);

    env.register(&key, "device-A").unwrap();
    let err = env.register(&key, "device-B").unwrap_err();
    assert!(matches!(err, CoreError::License(LicenseError::InvalidLicense(_))));
}

#[test]
fn malformed_key_is_invalid_license() {
    let env = env();
    let err = env.register("not-a-key", "device-A").unwrap_err();
    assert!(matches!(err, CoreError::License(LicenseError::InvalidLicense(ref k)) if k == "not-a-key"));

    let err = env
        .service
        .revoke_license(&RevokeLicenseRequest {
            license_key: "not-a-key".into(),
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::License(LicenseError::InvalidLicense(_))));
}

#[test]
fn revoke_then_register_fails() {
    let env = env();
    let go = env.add_course("Go", "# Go");
    let key = env.issue(&go, "1").remove(0);

    let request = RevokeLicenseRequest::from_json(&format!(r#"{{"licenseKey":"{key}"}}"#)).unwrap();
    assert_eq!(env.service.revoke_license(&request).unwrap().status, "License revoked");
    assert!(env.service.revoke_license(&request).is_err());
    assert!(env.register(&key, "device-A").is_err());
}

#[test]
fn issue_for_unknown_course_reports_batch() {
    let env = env();
    let request = IssueLicensesRequest {
        course_id: CourseId::new(),
        num: 4,
    };
    match env.service.issue_licenses(&request) {
        Err(CoreError::BatchIssue(batch)) => {
            assert!(batch.issued.is_empty());
            assert_eq!(batch.requested, 4);
            assert!(matches!(batch.source, LicenseError::InvalidCourse(_)));
        }
        other => panic!("expected batch failure, got {other:?}"),
    }
}

#[test]
fn download_for_stale_entitlement_fails_cleanly() {
    let env = env();
    let go = env.add_course("Go", "# Go");
    let key = env.issue(&go, "1").remove(0);
    env.register(&key, "device-A").unwrap();
    env.service.store().delete_course(&go.id).unwrap();

    let err = env
        .service
        .download(&DownloadRequest {
            hardware_id: HardwareId::new("device-A").unwrap(),
        })
        .unwrap_err();
    assert!(matches!(err, CoreError::Bundle(BundleError::MissingCourse(_))));
    assert_eq!(env.leftover_bundles(), 0);
}

#[test]
fn open_from_config_uses_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("svc.db");
    let config = LearnadoConfig::from_toml_str(&format!(
        "database_path = {:?}\n",
        db.to_str().unwrap()
    ))
    .unwrap();

    let service = Learnado::open(&config).unwrap();
    let course = Course::new("Persisted", dir.path().join("c"));
    service.store().save_course(&course).unwrap();
    drop(service);

    let reopened = SqliteStore::open(&db).unwrap();
    assert_eq!(reopened.get_course(&course.id).unwrap(), Some(course));
}
