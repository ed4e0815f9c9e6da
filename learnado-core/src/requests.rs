//! Typed request schemas for the external actions.
//!
//! Each request is parsed from a JSON object and validated field by field,
//! so a bad request becomes [`CoreError::Validation`] naming the field
//! instead of a panic or an opaque decode error.

use crate::error::{CoreError, CoreResult};
use learnado_types::{CourseId, Entitlement, EntitlementId, HardwareId};
use serde::Serialize;
use serde_json::{Map, Value};

/// A request that can be built from a JSON object body.
pub trait Request: Sized {
    fn from_fields(fields: &Fields<'_>) -> CoreResult<Self>;

    /// Parses a JSON body into this request.
    fn from_json(body: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| CoreError::validation("body", format!("malformed JSON: {e}")))?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> CoreResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::validation("body", "expected a JSON object"))?;
        Self::from_fields(&Fields(object))
    }
}

/// Field accessors over a request object.
pub struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, name: &'static str) -> CoreResult<&'a Value> {
        match self.0.get(name) {
            None | Some(Value::Null) => Err(CoreError::validation(name, "missing")),
            Some(value) => Ok(value),
        }
    }

    /// A non-blank string field.
    pub fn string(&self, name: &'static str) -> CoreResult<&'a str> {
        let s = self
            .get(name)?
            .as_str()
            .ok_or_else(|| CoreError::validation(name, "expected a string"))?;
        if s.trim().is_empty() {
            return Err(CoreError::validation(name, "must not be blank"));
        }
        Ok(s)
    }

    /// A positive integer given either as a JSON number or a numeric string.
    pub fn count(&self, name: &'static str) -> CoreResult<usize> {
        let n = match self.get(name)? {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| CoreError::validation(name, "expected a non-negative integer"))?,
            Value::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| CoreError::validation(name, format!("{s:?} is not an integer")))?,
            _ => return Err(CoreError::validation(name, "expected a number")),
        };
        if n == 0 {
            return Err(CoreError::validation(name, "must be at least 1"));
        }
        usize::try_from(n).map_err(|_| CoreError::validation(name, "too large"))
    }

    pub fn hardware_id(&self, name: &'static str) -> CoreResult<HardwareId> {
        HardwareId::new(self.string(name)?)
            .map_err(|e| CoreError::validation(name, e.to_string()))
    }
}

// ── Requests ────────────────────────────────────────────────────────

/// `{"courseID": "...", "num": 3}` (`num` may also be `"3"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLicensesRequest {
    pub course_id: CourseId,
    pub num: usize,
}

impl Request for IssueLicensesRequest {
    fn from_fields(fields: &Fields<'_>) -> CoreResult<Self> {
        let course_id = CourseId::parse(fields.string("courseID")?)
            .map_err(|_| CoreError::validation("courseID", "not a valid course id"))?;
        Ok(Self {
            course_id,
            num: fields.count("num")?,
        })
    }
}

/// `{"licenseKey": "...", "hardwareID": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLicenseRequest {
    /// Kept as text: a key that does not parse is an unknown license, not a
    /// malformed request.
    pub license_key: String,
    pub hardware_id: HardwareId,
}

impl Request for RegisterLicenseRequest {
    fn from_fields(fields: &Fields<'_>) -> CoreResult<Self> {
        Ok(Self {
            license_key: fields.string("licenseKey")?.to_owned(),
            hardware_id: fields.hardware_id("hardwareID")?,
        })
    }
}

/// `{"licenseKey": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeLicenseRequest {
    pub license_key: String,
}

impl Request for RevokeLicenseRequest {
    fn from_fields(fields: &Fields<'_>) -> CoreResult<Self> {
        Ok(Self {
            license_key: fields.string("licenseKey")?.to_owned(),
        })
    }
}

/// `{"hardwareID": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub hardware_id: HardwareId,
}

impl Request for DownloadRequest {
    fn from_fields(fields: &Fields<'_>) -> CoreResult<Self> {
        Ok(Self {
            hardware_id: fields.hardware_id("hardwareID")?,
        })
    }
}

// ── Responses ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueLicensesResponse {
    #[serde(rename = "licenseKeys")]
    pub license_keys: Vec<String>,
}

/// `{"status": "...", "entitlementID": "...", "courseID": "...", "hardwareID": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterLicenseResponse {
    pub status: &'static str,
    #[serde(rename = "entitlementID")]
    pub entitlement_id: EntitlementId,
    #[serde(rename = "courseID")]
    pub course_id: CourseId,
    #[serde(rename = "hardwareID")]
    pub hardware_id: HardwareId,
}

impl RegisterLicenseResponse {
    pub(crate) fn registered(entitlement: Entitlement) -> Self {
        Self {
            status: "License registered",
            entitlement_id: entitlement.id,
            course_id: entitlement.course_id,
            hardware_id: entitlement.hardware_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevokeLicenseResponse {
    pub status: &'static str,
}

/// A packaged bundle read back into memory. The file it came from has
/// already been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResponse {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sha256: String,
}
