use std::sync::Arc;

use uuid::Uuid;

use sonder_core::s3_keys;
use sonder_storage::objects::ObjectStore;
use sonder_storage::state;

use crate::error::AuditError;
use crate::events::AuditRecord;

/// Write-once audit log. Exposes append and read; nothing else.
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn ObjectStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Emit and persist a record. Each record gets its own key and is
    /// written with a create-only condition, so nothing is ever replaced.
    pub async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        record.emit();
        let key = s3_keys::audit_record(record.at, record.id);
        state::create_state(self.store.as_ref(), &key, &record).await?;
        Ok(())
    }

    /// All records mentioning `assessment_id`, oldest first.
    pub async fn records_for(&self, assessment_id: Uuid) -> Result<Vec<AuditRecord>, AuditError> {
        let keys = self.store.list_objects(s3_keys::AUDIT_PREFIX).await?;

        let mut records = Vec::new();
        for key in &keys {
            let (record, _) = state::load_state::<AuditRecord>(self.store.as_ref(), key).await?;
            if record.assessment_id == Some(assessment_id) {
                records.push(record);
            }
        }
        records.sort_by_key(|r| r.at);
        Ok(records)
    }
}
