use aws_sdk_s3::Client;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;
use crate::objects::{BoxFuture, GetObjectOutput, ObjectStore};

/// `ObjectStore` backed by a single S3 bucket.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    async fn get(&self, key: &str) -> Result<GetObjectOutput, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::GetObject(err.to_string())
                }
            })?;

        let etag = resp.e_tag().map(|s| s.to_string());
        let content_type = resp.content_type().map(|s| s.to_string());
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::GetObject(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(GetObjectOutput {
            body,
            etag,
            content_type,
        })
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        condition: WriteCondition<'_>,
    ) -> Result<String, StorageError> {
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(ct) = content_type {
            req = req.content_type(ct);
        }

        req = match condition {
            WriteCondition::IfMatch(etag) => req.if_match(etag),
            WriteCondition::IfAbsent => req.if_none_match("*"),
        };

        let resp = req.send().await.map_err(|e| {
            let err = e.into_service_error();
            if is_condition_failure(&err) {
                tracing::debug!(key, "conditional write rejected");
                StorageError::PreconditionFailed {
                    key: key.to_string(),
                }
            } else {
                StorageError::PutObject(err.to_string())
            }
        })?;

        Ok(resp.e_tag().unwrap_or_default().to_string())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;

            for obj in resp.contents() {
                if let Some(key) = obj.key() {
                    keys.push(key.to_string());
                }
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        Ok(keys)
    }
}

enum WriteCondition<'a> {
    IfMatch(&'a str),
    IfAbsent,
}

/// S3 answers a failed `If-Match`/`If-None-Match` with 412
/// PreconditionFailed, or 409 ConditionalRequestConflict when two
/// conditional writes race on the same key.
fn is_condition_failure(err: &PutObjectError) -> bool {
    matches!(
        err.code(),
        Some("PreconditionFailed") | Some("ConditionalRequestConflict")
    )
}

impl ObjectStore for S3ObjectStore {
    fn get_object<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>> {
        Box::pin(self.get(key))
    }

    fn put_object_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(self.put(
            key,
            body,
            content_type,
            WriteCondition::IfMatch(expected_etag),
        ))
    }

    fn put_object_if_absent<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(self.put(key, body, content_type, WriteCondition::IfAbsent))
    }

    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(self.list(prefix))
    }
}
