//! S3-compatible bucket client implementation

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use super::{ObjectStore, StoreError, StoreResult};

// SigV4 refuses to sign URLs valid for longer than one week.
const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 3600);

/// Connection settings for an S3-compatible storage service
#[derive(Clone)]
pub struct StoreConfig {
    /// Storage service endpoint URL
    pub endpoint: String,
    /// Access key id
    pub access_key_id: String,
    /// Access key secret
    pub access_key_secret: String,
    /// Bucket receiving the uploads
    pub bucket: String,
    /// Signing region, usually ignored by S3-compatible endpoints
    pub region: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Client for single-object operations against one bucket
pub struct BucketClient {
    client: Client,
    bucket: String,
}

impl BucketClient {
    /// Creates a client for the configured endpoint and bucket
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
            None,
            None,
            "upload-job",
        );

        // The publisher drives its own bounded retry loop, so the SDK must
        // not add attempts of its own.
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();

        info!(
            "initialized bucket client for {} at {}",
            config.bucket, config.endpoint
        );

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for BucketClient {
    async fn put_file(&self, key: &str, path: &Path) -> StoreResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await?;

        debug!("stored object {}", key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> StoreResult<String> {
        let expires_in = expires_in.min(MAX_PRESIGN_EXPIRY);
        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StoreError::Config(format!("failed to create presigning config: {e}"))
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await?;

        Ok(presigned.uri().to_string())
    }
}
