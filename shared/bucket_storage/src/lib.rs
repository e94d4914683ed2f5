//! Object storage client for publishing build outputs

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod client;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use client::{BucketClient, StoreConfig};
pub use error::{StoreError, StoreResult};

/// Single-object operations against a bucket-based blob store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads one local file under the given object key
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the file cannot be read,
    /// `StoreError::Service` if the backend rejects the request, or
    /// `StoreError::Connection` if the request never reaches the backend
    async fn put_file(&self, key: &str, path: &Path) -> StoreResult<()>;

    /// Produces a time-limited GET URL for an object
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the signing configuration is invalid,
    /// `StoreError::Service` if the backend rejects the signing request, or
    /// `StoreError::Connection` if the request never reaches the backend
    async fn presign_get(&self, key: &str, expires_in: Duration) -> StoreResult<String>;
}

#[async_trait]
impl<S: ObjectStore + ?Sized> ObjectStore for Arc<S> {
    async fn put_file(&self, key: &str, path: &Path) -> StoreResult<()> {
        (**self).put_file(key, path).await
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> StoreResult<String> {
        (**self).presign_get(key, expires_in).await
    }
}
