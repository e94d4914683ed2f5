//! Error types for object storage operations

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::operation::{RequestId, RequestIdExt};
use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to the storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend received the request and rejected it with an error response
    #[error(
        "service rejected the request: {message} (code: {code}, request id: {request_id}, host id: {host_id})"
    )]
    Service {
        /// Error message returned by the backend
        message: String,
        /// Error code returned by the backend
        code: String,
        /// Request id assigned by the backend
        request_id: String,
        /// Id of the backend host that answered
        host_id: String,
    },

    /// The request never reached the backend
    #[error("connection to storage backend failed: {0}")]
    Connection(String),

    /// The local file could not be read
    #[error("failed to read local file: {0}")]
    Read(String),

    /// Invalid client or signing configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Splits an SDK operation error into the service-rejected and
    /// connection-failure categories
    fn from_sdk<E>(error: SdkError<E>) -> Self
    where
        E: ProvideErrorMetadata + RequestId + RequestIdExt + std::error::Error + Send + Sync + 'static,
    {
        match error {
            SdkError::ServiceError(ctx) => {
                let err = ctx.into_err();
                Self::Service {
                    message: err.message().unwrap_or("unknown").to_string(),
                    code: err.code().unwrap_or("unknown").to_string(),
                    request_id: err.request_id().unwrap_or("unknown").to_string(),
                    host_id: err.extended_request_id().unwrap_or("unknown").to_string(),
                }
            }
            other => Self::Connection(other.to_string()),
        }
    }
}

impl From<SdkError<PutObjectError>> for StoreError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        Self::from_sdk(error)
    }
}

impl From<SdkError<GetObjectError>> for StoreError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        Self::from_sdk(error)
    }
}
