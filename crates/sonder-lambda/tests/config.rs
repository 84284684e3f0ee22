use std::collections::HashMap;

use jiff::SignedDuration;

use sonder_lambda::config::{LambdaConfig, PatientSource, StoreBackend};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_apply_when_unset() {
    let config = LambdaConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.bucket, "sonder");
    assert_eq!(config.store, StoreBackend::S3);
    assert_eq!(config.patients, PatientSource::Roster);
    assert_eq!(config.engine.default_link_ttl_days, 7);
    assert_eq!(config.engine.max_link_ttl_days, 30);
    assert_eq!(config.engine.inactivity_threshold, SignedDuration::from_hours(24));
}

#[test]
fn overrides_are_parsed() {
    let config = LambdaConfig::from_lookup(lookup(&[
        ("SONDER_BUCKET", "sonder-prod"),
        ("SONDER_STORE", "memory"),
        ("SONDER_PATIENT_DIRECTORY", "open"),
        ("SONDER_LINK_TTL_DAYS", "3"),
        ("SONDER_LINK_MAX_TTL_DAYS", "14"),
        ("SONDER_INACTIVITY_HOURS", " 6 "),
    ]))
    .unwrap();
    assert_eq!(config.bucket, "sonder-prod");
    assert_eq!(config.store, StoreBackend::Memory);
    assert_eq!(config.patients, PatientSource::Open);
    assert_eq!(config.engine.default_link_ttl_days, 3);
    assert_eq!(config.engine.max_link_ttl_days, 14);
    assert_eq!(config.engine.inactivity_threshold, SignedDuration::from_hours(6));
}

#[test]
fn invalid_values_are_rejected_at_startup() {
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_STORE", "dynamo")])).is_err());
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_LINK_TTL_DAYS", "a week")])).is_err());
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_LINK_TTL_DAYS", "45")])).is_err());
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_INACTIVITY_HOURS", "0")])).is_err());
    assert!(
        LambdaConfig::from_lookup(lookup(&[("SONDER_INACTIVITY_HOURS", "9223372036854775807")]))
            .is_err()
    );
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_LINK_MAX_TTL_DAYS", "100000000")])).is_err());
}

#[test]
fn open_patient_directory_is_refused_against_s3() {
    let err = LambdaConfig::from_lookup(lookup(&[("SONDER_PATIENT_DIRECTORY", "open")])).unwrap_err();
    assert!(err.to_string().contains("SONDER_STORE=memory"));

    assert!(
        LambdaConfig::from_lookup(lookup(&[
            ("SONDER_STORE", "s3"),
            ("SONDER_PATIENT_DIRECTORY", "open"),
        ]))
        .is_err()
    );
    assert!(LambdaConfig::from_lookup(lookup(&[("SONDER_PATIENT_DIRECTORY", "ldap")])).is_err());

    let config = LambdaConfig::from_lookup(lookup(&[("SONDER_STORE", "memory")])).unwrap();
    assert_eq!(config.patients, PatientSource::Roster);
}
