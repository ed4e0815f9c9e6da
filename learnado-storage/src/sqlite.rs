//! SQLite-backed [`RecordStore`].

use crate::error::{StorageError, StorageResult};
use crate::store::RecordStore;
use learnado_types::{
    Course, CourseId, Entitlement, EntitlementId, HardwareId, License, LicenseId,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// How long a writer waits on another process's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent record store backed by SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("Opened record store at {}", path.as_ref().display());
        Ok(store)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS courses (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                content_root TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS licenses (
                id TEXT PRIMARY KEY,
                course_id TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS entitlements (
                id TEXT PRIMARY KEY,
                course_id TEXT NOT NULL,
                hardware_id TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_licenses_course ON licenses(course_id);
            CREATE INDEX IF NOT EXISTS idx_entitlements_hardware ON entitlements(hardware_id);
            CREATE INDEX IF NOT EXISTS idx_entitlements_course ON entitlements(course_id);
            ",
        )?;
        Ok(())
    }
}

// ── Row conversion ──────────────────────────────────────────────────

fn parse_course_id(s: &str) -> StorageResult<CourseId> {
    CourseId::parse(s).map_err(|e| StorageError::InvalidData(format!("course id {s:?}: {e}")))
}

fn parse_license_id(s: &str) -> StorageResult<LicenseId> {
    LicenseId::parse(s).map_err(|e| StorageError::InvalidData(format!("license id {s:?}: {e}")))
}

fn parse_entitlement_id(s: &str) -> StorageResult<EntitlementId> {
    EntitlementId::parse(s)
        .map_err(|e| StorageError::InvalidData(format!("entitlement id {s:?}: {e}")))
}

fn parse_hardware_id(s: String) -> StorageResult<HardwareId> {
    HardwareId::new(s).map_err(|e| StorageError::InvalidData(e.to_string()))
}

fn path_to_text(path: &Path) -> StorageResult<&str> {
    path.to_str().ok_or_else(|| {
        StorageError::InvalidData(format!("content root is not UTF-8: {}", path.display()))
    })
}

fn license_from_row(id: &str, course_id: &str) -> StorageResult<License> {
    Ok(License {
        id: parse_license_id(id)?,
        course_id: parse_course_id(course_id)?,
    })
}

fn entitlement_from_row(id: &str, course_id: &str, hardware_id: String) -> StorageResult<Entitlement> {
    Ok(Entitlement {
        id: parse_entitlement_id(id)?,
        course_id: parse_course_id(course_id)?,
        hardware_id: parse_hardware_id(hardware_id)?,
    })
}

impl RecordStore for SqliteStore {
    // ── Courses ─────────────────────────────────────────────────────

    fn save_course(&self, course: &Course) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO courses (id, name, content_root) VALUES (?1, ?2, ?3)",
            params![
                course.id.to_string(),
                course.name,
                path_to_text(&course.content_root)?,
            ],
        )?;
        debug!("Saved course {} ({})", course.id, course.name);
        Ok(())
    }

    fn get_course(&self, id: &CourseId) -> StorageResult<Option<Course>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT name, content_root FROM courses WHERE id = ?1",
                params![id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        Ok(row.map(|(name, content_root)| Course {
            id: *id,
            name,
            content_root: PathBuf::from(content_root),
        }))
    }

    fn update_course(&self, course: &Course) -> StorageResult<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "UPDATE courses SET name = ?2, content_root = ?3 WHERE id = ?1",
            params![
                course.id.to_string(),
                course.name,
                path_to_text(&course.content_root)?,
            ],
        )?;
        Ok(rows > 0)
    }

    fn delete_course(&self, id: &CourseId) -> StorageResult<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM courses WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    // ── Licenses ────────────────────────────────────────────────────

    fn save_license(&self, license: &License) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO licenses (id, course_id) VALUES (?1, ?2)",
            params![license.id.to_string(), license.course_id.to_string()],
        )?;
        debug!("Saved license {} for course {}", license.id, license.course_id);
        Ok(())
    }

    fn get_license(&self, id: &LicenseId) -> StorageResult<Option<License>> {
        let conn = self.lock()?;
        let course_id = conn
            .query_row(
                "SELECT course_id FROM licenses WHERE id = ?1",
                params![id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        course_id
            .map(|course_id| {
                Ok(License {
                    id: *id,
                    course_id: parse_course_id(&course_id)?,
                })
            })
            .transpose()
    }

    fn licenses_for_course(&self, course_id: &CourseId) -> StorageResult<Vec<License>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, course_id FROM licenses WHERE course_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![course_id.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(id, course_id)| license_from_row(id, course_id))
            .collect()
    }

    fn delete_license(&self, id: &LicenseId) -> StorageResult<bool> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM licenses WHERE id = ?1", params![id.to_string()])?;
        Ok(rows > 0)
    }

    // ── Entitlements ────────────────────────────────────────────────

    fn save_entitlement(&self, entitlement: &Entitlement) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO entitlements (id, course_id, hardware_id) VALUES (?1, ?2, ?3)",
            params![
                entitlement.id.to_string(),
                entitlement.course_id.to_string(),
                entitlement.hardware_id.as_str(),
            ],
        )?;
        Ok(())
    }

    fn entitlements_for_hardware(
        &self,
        hardware_id: &HardwareId,
    ) -> StorageResult<Vec<Entitlement>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, course_id, hardware_id FROM entitlements
             WHERE hardware_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![hardware_id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, course_id, hw)| entitlement_from_row(&id, &course_id, hw))
            .collect()
    }

    fn entitlement_exists(
        &self,
        course_id: &CourseId,
        hardware_id: &HardwareId,
    ) -> StorageResult<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM entitlements WHERE course_id = ?1 AND hardware_id = ?2 LIMIT 1",
                params![course_id.to_string(), hardware_id.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ── Consume-once transition ─────────────────────────────────────

    fn redeem_license(
        &self,
        license_id: &LicenseId,
        entitlement_id: EntitlementId,
        hardware_id: &HardwareId,
    ) -> StorageResult<Option<Entitlement>> {
        let mut conn = self.lock()?;
        // IMMEDIATE takes the write lock up front so a second process cannot
        // read the same license between our SELECT and DELETE.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let course_id = tx
            .query_row(
                "SELECT course_id FROM licenses WHERE id = ?1",
                params![license_id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(course_id) = course_id else {
            // Dropping the transaction rolls it back; nothing was written.
            return Ok(None);
        };
        let course_id = parse_course_id(&course_id)?;

        let deleted = tx.execute(
            "DELETE FROM licenses WHERE id = ?1",
            params![license_id.to_string()],
        )?;
        if deleted != 1 {
            return Ok(None);
        }

        tx.execute(
            "INSERT INTO entitlements (id, course_id, hardware_id) VALUES (?1, ?2, ?3)",
            params![
                entitlement_id.to_string(),
                course_id.to_string(),
                hardware_id.as_str(),
            ],
        )?;
        tx.commit()?;

        debug!("Redeemed license {license_id} for course {course_id} on {hardware_id}");
        Ok(Some(Entitlement {
            id: entitlement_id,
            course_id,
            hardware_id: hardware_id.clone(),
        }))
    }
}
