//! Upload job configuration and validation

use std::fmt;

use clap::{Args, ValueEnum};
use thiserror::Error;

/// Configuration errors reported before the job runs
#[derive(Error, Debug, PartialEq, Eq)]
pub enum JobError {
    /// A required field was left empty
    #[error("required field {0} is empty")]
    MissingField(&'static str),

    /// A path pattern does not begin with a slash
    #[error("{field} entry {value:?} must begin with a slash")]
    PathWithoutSlash {
        /// Offending configuration field
        field: &'static str,
        /// The rejected pattern
        value: String,
    },
}

/// Terminal status reported by the build host
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// The build finished successfully
    Success,
    /// The build failed
    Failure,
    /// The build finished with test failures
    Unstable,
    /// The build was aborted
    Aborted,
}

/// Configuration for one publishing job, immutable once parsed
#[derive(Args, Clone)]
pub struct UploadJob {
    /// Storage service endpoint URL
    #[arg(long, env = "OSS_ENDPOINT")]
    pub endpoint: String,

    /// Access key id for the storage service
    #[arg(long, env = "OSS_ACCESS_KEY_ID")]
    pub access_key_id: String,

    /// Access key secret for the storage service
    #[arg(long, env = "OSS_ACCESS_KEY_SECRET", hide_env_values = true)]
    pub access_key_secret: String,

    /// Bucket receiving the uploads
    #[arg(long, env = "OSS_BUCKET")]
    pub bucket: String,

    /// Signing region, usually ignored by S3-compatible endpoints
    #[arg(long, env = "OSS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Local path pattern; must begin with '/', resolved against the
    /// workspace root after the leading slash is stripped
    #[arg(long)]
    pub local_path: String,

    /// Comma-separated remote path patterns, each beginning with '/'
    #[arg(long)]
    pub remote_path: String,

    /// How many times a failed upload is retried before the run aborts
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Sign a time-limited download URL for every uploaded file
    #[arg(long)]
    pub auto_sign: bool,

    /// Webhook endpoint receiving the download-link notification
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Skip TLS certificate verification when posting to the webhook
    #[arg(long)]
    pub webhook_skip_tls_verify: bool,
}

impl UploadJob {
    /// Checks the invariants the build host's form would have enforced
    ///
    /// # Errors
    ///
    /// Returns `JobError` when a required field is empty or a path pattern
    /// does not begin with a slash
    pub fn validate(&self) -> Result<(), JobError> {
        let required = [
            ("endpoint", &self.endpoint),
            ("access-key-id", &self.access_key_id),
            ("access-key-secret", &self.access_key_secret),
            ("bucket", &self.bucket),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(JobError::MissingField(field));
            }
        }

        if !self.local_path.starts_with('/') {
            return Err(JobError::PathWithoutSlash {
                field: "local-path",
                value: self.local_path.clone(),
            });
        }

        if self.remote_path.is_empty() {
            return Err(JobError::MissingField("remote-path"));
        }
        for remote in self.remote_patterns() {
            if !remote.starts_with('/') {
                return Err(JobError::PathWithoutSlash {
                    field: "remote-path",
                    value: remote.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Remote patterns in declaration order, leading slashes intact
    pub fn remote_patterns(&self) -> impl Iterator<Item = &str> {
        self.remote_path.split(',')
    }
}

impl fmt::Debug for UploadJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadJob")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("local_path", &self.local_path)
            .field("remote_path", &self.remote_path)
            .field("max_retries", &self.max_retries)
            .field("auto_sign", &self.auto_sign)
            .field("webhook_url", &self.webhook_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        job: UploadJob,
    }

    fn test_job() -> UploadJob {
        UploadJob {
            endpoint: "https://oss.example.com".to_string(),
            access_key_id: "key-id".to_string(),
            access_key_secret: "key-secret".to_string(),
            bucket: "artifacts".to_string(),
            region: "us-east-1".to_string(),
            local_path: "/build/out".to_string(),
            remote_path: "/releases/v1".to_string(),
            max_retries: 3,
            auto_sign: false,
            webhook_url: None,
            webhook_skip_tls_verify: false,
        }
    }

    #[test]
    fn test_max_retries_defaults_to_three() {
        let cli = TestCli::parse_from([
            "publisher",
            "--endpoint",
            "https://oss.example.com",
            "--access-key-id",
            "key-id",
            "--access-key-secret",
            "key-secret",
            "--bucket",
            "artifacts",
            "--local-path",
            "/build/out",
            "--remote-path",
            "/releases/v1",
        ]);

        assert_eq!(cli.job.max_retries, 3);
        assert!(!cli.job.auto_sign);
        assert_eq!(cli.job.webhook_url, None);
    }

    #[test]
    fn test_validate_accepts_wellformed_job() {
        assert_eq!(test_job().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_required_field() {
        let mut job = test_job();
        job.bucket.clear();
        assert_eq!(job.validate(), Err(JobError::MissingField("bucket")));
    }

    #[test]
    fn test_validate_rejects_local_path_without_slash() {
        let mut job = test_job();
        job.local_path = "build/out".to_string();
        assert_eq!(
            job.validate(),
            Err(JobError::PathWithoutSlash {
                field: "local-path",
                value: "build/out".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_checks_every_remote_pattern() {
        let mut job = test_job();
        job.remote_path = "/releases/v1,releases/v2".to_string();
        assert_eq!(
            job.validate(),
            Err(JobError::PathWithoutSlash {
                field: "remote-path",
                value: "releases/v2".to_string(),
            })
        );
    }

    #[test]
    fn test_remote_patterns_split_on_commas() {
        let mut job = test_job();
        job.remote_path = "/releases/v1,/archive".to_string();
        let patterns: Vec<&str> = job.remote_patterns().collect();
        assert_eq!(patterns, vec!["/releases/v1", "/archive"]);
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let rendered = format!("{:?}", test_job());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("key-secret"));
    }
}
