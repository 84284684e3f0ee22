use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sonder_assessments::clock::SystemClock;
use sonder_assessments::directory::{
    ClaimedTenantResolver, PatientDirectory, StaticPatientDirectory, StoredPatientDirectory,
};
use sonder_assessments::service::AssessmentService;
use sonder_instruments::catalog::ScaleCatalog;
use sonder_lambda::config::{LambdaConfig, PatientSource, StoreBackend};
use sonder_lambda::state::AppState;
use sonder_storage::memory::MemoryObjectStore;
use sonder_storage::objects::ObjectStore;
use sonder_storage::s3::S3ObjectStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = LambdaConfig::from_env()?;

    let store: Arc<dyn ObjectStore> = match config.store {
        StoreBackend::S3 => {
            let client = sonder_storage::client::build_client().await;
            Arc::new(S3ObjectStore::new(client, config.bucket.clone()))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; nothing survives a cold start");
            Arc::new(MemoryObjectStore::new())
        }
    };

    let catalog = ScaleCatalog::builtin()?;
    tracing::info!(scales = catalog.list_active().len(), bucket = %config.bucket, "starting sonder api");

    let patients: Arc<dyn PatientDirectory> = match config.patients {
        PatientSource::Roster => Arc::new(StoredPatientDirectory::new(store.clone())),
        PatientSource::Open => {
            tracing::warn!("patient directory is open; every patient exists in every tenant");
            Arc::new(StaticPatientDirectory::open())
        }
    };

    let service = AssessmentService::new(
        store,
        Arc::new(catalog),
        patients,
        Arc::new(SystemClock),
        config.engine,
    )?;

    let state = AppState {
        service: Arc::new(service),
        tenants: Arc::new(ClaimedTenantResolver),
    };

    let app = sonder_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
