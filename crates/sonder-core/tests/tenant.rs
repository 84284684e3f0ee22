use sonder_core::models::tenant::{TenantKind, TenantRef};
use sonder_core::s3_keys;

#[test]
fn tenant_kind_parses_case_insensitively() {
    assert_eq!("Clinic".parse::<TenantKind>().unwrap(), TenantKind::Clinic);
    assert_eq!(" workspace ".parse::<TenantKind>().unwrap(), TenantKind::Workspace);
    assert!("hospital".parse::<TenantKind>().is_err());
}

#[test]
fn tenant_ref_rejects_blank_id() {
    assert!(TenantRef::clinic("   ").is_err());
    let tenant = TenantRef::workspace("ws-42").unwrap();
    assert_eq!(tenant.to_string(), "workspace:ws-42");
}

#[test]
fn audit_keys_sort_by_time_within_a_day() {
    let id = uuid::Uuid::nil();
    let early: jiff::Timestamp = "2026-03-01T08:00:00Z".parse().unwrap();
    let late: jiff::Timestamp = "2026-03-01T17:30:00Z".parse().unwrap();

    let early_key = s3_keys::audit_record(early, id);
    let late_key = s3_keys::audit_record(late, id);

    assert!(early_key.starts_with("audit/2026-03-01/"));
    assert!(early_key < late_key);
}
