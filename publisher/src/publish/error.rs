//! Error types for the publishing run

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for publishing operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Fatal errors that abort the whole run
#[derive(Error, Debug)]
pub enum PublishError {
    /// An upload kept failing after every allowed retry
    #[error("upload of object key {key} failed after {attempts} attempts")]
    RetriesExhausted {
        /// Object key whose upload was abandoned
        key: String,
        /// Total attempts made, retries included
        attempts: u32,
    },

    /// A local directory could not be listed
    #[error("failed to walk local path {path}: {source}")]
    Walk {
        /// Directory whose listing failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}
