//! Typed access to the persisted documents.

use std::sync::Arc;

use uuid::Uuid;

use sonder_core::models::assessment::Assessment;
use sonder_core::models::remote_link::{RemoteAssessmentLink, RemoteSession};
use sonder_core::s3_keys;
use sonder_storage::error::StorageError;
use sonder_storage::objects::ObjectStore;
use sonder_storage::state;

#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn ObjectStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn load_assessment(&self, id: Uuid) -> Result<Option<(Assessment, String)>, StorageError> {
        optional(state::load_state(self.store.as_ref(), &s3_keys::assessment(id)).await)
    }

    pub async fn insert_assessment(&self, assessment: &Assessment) -> Result<String, StorageError> {
        state::create_state(self.store.as_ref(), &s3_keys::assessment(assessment.id), assessment).await
    }

    pub async fn replace_assessment(
        &self,
        assessment: &Assessment,
        etag: &str,
    ) -> Result<String, StorageError> {
        state::save_state_if_match(
            self.store.as_ref(),
            &s3_keys::assessment(assessment.id),
            assessment,
            etag,
        )
        .await
    }

    pub async fn assessment_keys(&self) -> Result<Vec<String>, StorageError> {
        self.store.list_objects(s3_keys::ASSESSMENTS_PREFIX).await
    }

    pub async fn load_assessment_at(&self, key: &str) -> Result<(Assessment, String), StorageError> {
        state::load_state(self.store.as_ref(), key).await
    }

    pub async fn load_link(
        &self,
        token_id: &str,
    ) -> Result<Option<(RemoteAssessmentLink, String)>, StorageError> {
        optional(state::load_state(self.store.as_ref(), &s3_keys::remote_link(token_id)).await)
    }

    pub async fn insert_link(&self, link: &RemoteAssessmentLink) -> Result<String, StorageError> {
        state::create_state(self.store.as_ref(), &s3_keys::remote_link(&link.token_id), link).await
    }

    pub async fn replace_link(
        &self,
        link: &RemoteAssessmentLink,
        etag: &str,
    ) -> Result<String, StorageError> {
        state::save_state_if_match(
            self.store.as_ref(),
            &s3_keys::remote_link(&link.token_id),
            link,
            etag,
        )
        .await
    }

    pub async fn load_session(&self, session_id: &str) -> Result<Option<RemoteSession>, StorageError> {
        let loaded = optional(
            state::load_state(self.store.as_ref(), &s3_keys::remote_session(session_id)).await,
        )?;
        Ok(loaded.map(|(session, _)| session))
    }

    pub async fn insert_session(&self, session: &RemoteSession) -> Result<String, StorageError> {
        state::create_state(
            self.store.as_ref(),
            &s3_keys::remote_session(&session.session_id),
            session,
        )
        .await
    }
}

fn optional<T>(result: Result<T, StorageError>) -> Result<Option<T>, StorageError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StorageError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
