use std::env;

use eyre::{WrapErr, bail};
use jiff::SignedDuration;

use sonder_assessments::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    Memory,
}

/// Where patient membership is confirmed before an assessment is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientSource {
    /// Roster entries under `patients/` in the configured store.
    Roster,
    /// Every patient exists in every tenant. Only with the memory store.
    Open,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub bucket: String,
    pub store: StoreBackend,
    pub patients: PatientSource,
    pub engine: EngineConfig,
}

impl LambdaConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset variables take defaults; set
    /// but unparsable ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let bucket = lookup("SONDER_BUCKET").unwrap_or_else(|| "sonder".to_string());

        let store = match lookup("SONDER_STORE").as_deref().map(str::trim) {
            None | Some("s3") => StoreBackend::S3,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("SONDER_STORE must be 's3' or 'memory', got '{other}'"),
        };

        let patients = match lookup("SONDER_PATIENT_DIRECTORY").as_deref().map(str::trim) {
            None | Some("roster") => PatientSource::Roster,
            Some("open") if store == StoreBackend::Memory => PatientSource::Open,
            Some("open") => bail!("SONDER_PATIENT_DIRECTORY=open requires SONDER_STORE=memory"),
            Some(other) => {
                bail!("SONDER_PATIENT_DIRECTORY must be 'roster' or 'open', got '{other}'")
            }
        };

        let mut engine = EngineConfig::default();
        if let Some(days) = parse(&lookup, "SONDER_LINK_TTL_DAYS")? {
            engine.default_link_ttl_days = days;
        }
        if let Some(days) = parse(&lookup, "SONDER_LINK_MAX_TTL_DAYS")? {
            engine.max_link_ttl_days = days;
        }
        if let Some(hours) = parse(&lookup, "SONDER_INACTIVITY_HOURS")? {
            if !(1..=EngineConfig::INACTIVITY_CEILING_HOURS).contains(&hours) {
                bail!(
                    "SONDER_INACTIVITY_HOURS must be within 1..={}, got {hours}",
                    EngineConfig::INACTIVITY_CEILING_HOURS
                );
            }
            engine.inactivity_threshold = SignedDuration::from_hours(hours);
        }
        engine.validate()?;

        Ok(Self {
            bucket,
            store,
            patients,
            engine,
        })
    }
}

fn parse(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> eyre::Result<Option<i64>> {
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .wrap_err_with(|| format!("{name} must be an integer, got '{raw}'"))
        })
        .transpose()
}
