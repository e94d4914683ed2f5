//! Build output publisher: uploads a workspace tree to object storage,
//! signs download links, and notifies a webhook.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Job configuration and validation
pub mod job;

/// Webhook notification
pub mod notify;

/// Upload orchestration
pub mod publish;

/// Environment variable expansion
pub mod utils;

/// Local tree to object key mapping
pub mod walker;
