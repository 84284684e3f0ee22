use std::collections::BTreeMap;

use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::objects::{BoxFuture, GetObjectOutput, ObjectStore};

struct StoredObject {
    body: Vec<u8>,
    etag: String,
    content_type: Option<String>,
}

#[derive(Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    version: u64,
}

impl Inner {
    fn write(&mut self, key: &str, body: Vec<u8>, content_type: Option<&str>) -> String {
        self.version += 1;
        let etag = format!("\"{}\"", self.version);
        self.objects.insert(
            key.to_string(),
            StoredObject {
                body,
                etag: etag.clone(),
                content_type: content_type.map(str::to_string),
            },
        );
        etag
    }
}

/// In-process `ObjectStore` with the same conditional-write semantics as S3.
///
/// Each operation yields to the scheduler before touching the map, so
/// concurrent callers interleave between a read and its conditional write
/// the way they would against a remote store.
#[derive(Default)]
pub struct MemoryObjectStore {
    inner: Mutex<Inner>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects under `prefix`.
    pub async fn count(&self, prefix: &str) -> usize {
        let inner = self.inner.lock().await;
        inner.objects.keys().filter(|k| k.starts_with(prefix)).count()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let inner = self.inner.lock().await;
            let object = inner.objects.get(key).ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })?;
            Ok(GetObjectOutput {
                body: object.body.clone(),
                etag: Some(object.etag.clone()),
                content_type: object.content_type.clone(),
            })
        })
    }

    fn put_object_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let mut inner = self.inner.lock().await;
            let current = inner.objects.get(key).map(|o| o.etag.clone());
            match current {
                None => Err(StorageError::NotFound {
                    key: key.to_string(),
                }),
                Some(etag) if etag != expected_etag => {
                    Err(StorageError::PreconditionFailed {
                        key: key.to_string(),
                    })
                }
                Some(_) => Ok(inner.write(key, body, content_type)),
            }
        })
    }

    fn put_object_if_absent<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let mut inner = self.inner.lock().await;
            if inner.objects.contains_key(key) {
                return Err(StorageError::PreconditionFailed {
                    key: key.to_string(),
                });
            }
            Ok(inner.write(key, body, content_type))
        })
    }

    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, StorageError>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let inner = self.inner.lock().await;
            Ok(inner
                .objects
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        })
    }
}
