//! Upload orchestration: tree walking, bounded retry, link accumulation

mod error;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bucket_storage::{ObjectStore, StoreError};
use tracing::{error, info, warn};

use crate::job::{BuildStatus, UploadJob};
use crate::notify::Notifier;
use crate::utils::expand_vars;
use crate::walker::plan_uploads;

pub use error::{PublishError, PublishResult};

/// Download links stay valid for 30 days.
const SIGNED_URL_EXPIRY: Duration = Duration::from_secs(30 * 24 * 3600);

/// Drives one publishing run against a single bucket
pub struct Publisher<S> {
    store: S,
    job: UploadJob,
    notifier: Option<Notifier>,
}

impl<S: ObjectStore> Publisher<S> {
    /// Creates a publisher for the given job
    pub fn new(store: S, job: UploadJob, notifier: Option<Notifier>) -> Self {
        Self {
            store,
            job,
            notifier,
        }
    }

    /// Runs the job: uploads every remote pattern, then notifies the webhook
    /// with the links collected for that pattern.
    ///
    /// Does nothing unless the build finished successfully.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` when a directory cannot be walked or an upload
    /// exhausts its retries; either failure must fail the pipeline step.
    pub async fn run(
        &self,
        workspace: &Path,
        env: &HashMap<String, String>,
        build_status: BuildStatus,
    ) -> PublishResult<()> {
        if build_status != BuildStatus::Success {
            info!("build status is {:?}, skipping upload", build_status);
            return Ok(());
        }

        info!("auto sign => {}", self.job.auto_sign);
        info!("webhook configured => {}", self.job.webhook_url.is_some());

        let local = self.job.local_path.trim_start_matches('/');
        for remote in self.job.remote_patterns() {
            let remote = remote.trim_start_matches('/');
            let expanded_local = expand_vars(local, env);
            let expanded_remote = expand_vars(remote, env);
            info!("expanded local path => {expanded_local}");
            info!("expanded remote path => {expanded_remote}");

            let path = workspace.join(&expanded_local);
            let mut links = BTreeMap::new();

            if path.is_dir() {
                info!("uploading directory {}", path.display());
                let entries = plan_uploads(&expanded_remote, &path).map_err(|source| {
                    PublishError::Walk {
                        path: path.clone(),
                        source,
                    }
                })?;
                for entry in &entries {
                    self.upload_file(&entry.key, &entry.path, &mut links).await?;
                }
                info!("directory upload finished");
            } else {
                info!("uploading file {}", path.display());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                self.upload_file(&format!("{expanded_remote}/{name}"), &path, &mut links)
                    .await?;
                info!("file upload finished");
            }

            if let Some(notifier) = &self.notifier {
                if let Err(e) = notifier.notify(&links).await {
                    error!("webhook notification failed: {e}");
                }
            }
        }

        Ok(())
    }

    /// Uploads one file, retrying up to the configured bound.
    ///
    /// A file missing at upload time is skipped with a diagnostic; the
    /// listing may be stale by the time the transfer starts.
    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        links: &mut BTreeMap<PathBuf, String>,
    ) -> PublishResult<()> {
        if !path.exists() {
            warn!("file {} does not exist, skipped", path.display());
            return Ok(());
        }

        let key = key.trim_start_matches('/');
        let max_retries = self.job.max_retries;
        let mut retries = 0;
        loop {
            if retries > 0 {
                warn!("upload retrying ({retries}/{max_retries})");
            }
            info!("uploading [{}] to [{key}]", path.display());
            match self.store.put_file(key, path).await {
                Ok(()) => {
                    if self.job.auto_sign {
                        self.sign_file(key, path, links).await;
                    }
                    return Ok(());
                }
                Err(e) => error!("upload attempt failed: {e}"),
            }
            retries += 1;
            if retries > max_retries {
                break;
            }
        }

        Err(PublishError::RetriesExhausted {
            key: key.to_string(),
            attempts: max_retries + 1,
        })
    }

    /// Signs a download URL for an uploaded object, best effort.
    async fn sign_file(&self, key: &str, path: &Path, links: &mut BTreeMap<PathBuf, String>) {
        match self.store.presign_get(key, SIGNED_URL_EXPIRY).await {
            Ok(url) => {
                info!("signed url for [{key}]: {url}");
                links.insert(path.to_path_buf(), url);
            }
            Err(e @ StoreError::Service { .. }) => {
                error!("signing request reached the storage service but was rejected: {e}");
            }
            Err(e) => {
                error!("signing request could not reach the storage service: {e}");
            }
        }
    }
}
