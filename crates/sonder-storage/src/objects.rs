use std::future::Future;
use std::pin::Pin;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a GET operation, including the body and ETag.
pub struct GetObjectOutput {
    pub body: Vec<u8>,
    pub etag: Option<String>,
    pub content_type: Option<String>,
}

/// Key/value object storage with optimistic concurrency.
///
/// Every write is conditional. No delete operation: assessments, links and
/// audit records are retained for history.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ObjectStore: Send + Sync {
    fn get_object<'a>(
        &'a self,
        key: &'a str,
    ) -> BoxFuture<'a, Result<GetObjectOutput, StorageError>>;

    /// Write only if the stored ETag still equals `expected_etag`.
    /// Returns `StorageError::PreconditionFailed` otherwise.
    fn put_object_if_match<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
        expected_etag: &'a str,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// Write only if nothing exists at `key` yet.
    /// Returns `StorageError::PreconditionFailed` otherwise.
    fn put_object_if_absent<'a>(
        &'a self,
        key: &'a str,
        body: Vec<u8>,
        content_type: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, StorageError>>;

    /// List keys under a prefix, sorted.
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, StorageError>>;
}
