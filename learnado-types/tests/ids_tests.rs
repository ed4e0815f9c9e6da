use learnado_types::{CourseId, Error, HardwareId, LicenseId};
use std::collections::HashSet;
use std::str::FromStr;

// ── UUID identifiers ──────────────────────────────────────────────

#[test]
fn license_id_new_is_unique() {
    let ids: HashSet<LicenseId> = (0..1000).map(|_| LicenseId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn license_id_is_random_v4() {
    let id = LicenseId::new();
    assert_eq!(id.as_uuid().get_version_num(), 4);
}

#[test]
fn course_id_display_and_parse() {
    let id = CourseId::new();
    let parsed = CourseId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn license_id_parse_tolerates_surrounding_whitespace() {
    let id = LicenseId::new();
    let parsed = LicenseId::from_str(&format!("  {id}\n")).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn license_id_parse_invalid() {
    assert!(LicenseId::parse("not-a-uuid").is_err());
    assert!(LicenseId::from_str("").is_err());
}

#[test]
fn ids_serialize_transparently() {
    let id = CourseId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let back: CourseId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ── HardwareId ────────────────────────────────────────────────────

#[test]
fn hardware_id_keeps_input_verbatim() {
    let hw = HardwareId::new(" HW-A ").unwrap();
    assert_eq!(hw.as_str(), " HW-A ");
    assert_eq!(hw.as_bytes(), b" HW-A ");
}

#[test]
fn hardware_id_rejects_blank() {
    assert!(matches!(HardwareId::new(""), Err(Error::InvalidHardwareId(_))));
    assert!(matches!(HardwareId::new(" \t\n"), Err(Error::InvalidHardwareId(_))));
}

#[test]
fn hardware_id_serde_rejects_blank() {
    let ok: HardwareId = serde_json::from_str("\"HW-B\"").unwrap();
    assert_eq!(ok.to_string(), "HW-B");
    assert!(serde_json::from_str::<HardwareId>("\"  \"").is_err());
}
