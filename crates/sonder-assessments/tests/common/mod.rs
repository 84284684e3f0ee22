#![allow(dead_code)]

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use sonder_assessments::clock::ManualClock;
use sonder_assessments::config::EngineConfig;
use sonder_assessments::directory::StaticPatientDirectory;
use sonder_assessments::service::{AssessmentService, NewAssessment};
use sonder_core::models::assessment::{Assessment, AssessmentMode};
use sonder_core::models::tenant::TenantRef;
use sonder_instruments::catalog::ScaleCatalog;
use sonder_storage::memory::MemoryObjectStore;

pub const PATIENT: &str = "patient-7";
pub const CLINICIAN: &str = "dr-okafor";

pub struct Harness {
    pub service: AssessmentService,
    pub store: Arc<MemoryObjectStore>,
    pub clock: Arc<ManualClock>,
    pub tenant: TenantRef,
}

pub fn start_time() -> Timestamp {
    "2026-03-02T09:00:00Z".parse().unwrap()
}

pub fn days(n: i64) -> SignedDuration {
    SignedDuration::from_hours(n * 24)
}

pub fn harness() -> Harness {
    let tenant = TenantRef::clinic("riverside").unwrap();
    let store = Arc::new(MemoryObjectStore::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let patients = StaticPatientDirectory::default()
        .with_patient(tenant.clone(), PATIENT)
        .with_patient(TenantRef::workspace("solo").unwrap(), PATIENT);

    let service = AssessmentService::new(
        store.clone(),
        Arc::new(ScaleCatalog::builtin().unwrap()),
        Arc::new(patients),
        clock.clone(),
        EngineConfig::default(),
    )
    .unwrap();

    Harness {
        service,
        store,
        clock,
        tenant,
    }
}

impl Harness {
    pub async fn create(&self, scale_id: &str, mode: AssessmentMode) -> Assessment {
        let assessment = self
            .service
            .create_assessment(
                &self.tenant,
                CLINICIAN,
                NewAssessment {
                    patient_id: PATIENT.to_string(),
                    scale_id: scale_id.to_string(),
                    mode,
                },
            )
            .await
            .unwrap();
        self.clock.advance(SignedDuration::from_secs(1));
        assessment
    }

    pub async fn answer_all(&self, id: Uuid, prefix: &str, count: u32, value: u32) {
        for n in 1..=count {
            self.service
                .submit_response(id, &self.tenant, &format!("{prefix}_{n}"), value)
                .await
                .unwrap();
        }
    }
}

impl Harness {
    pub fn clock_now(&self) -> Timestamp {
        use sonder_assessments::clock::Clock;
        self.clock.now()
    }
}
