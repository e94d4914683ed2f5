//! Webhook notification carrying signed download links

mod error;

use std::collections::BTreeMap;
use std::path::PathBuf;

use reqwest::header::CONTENT_TYPE;
use reqwest::tls::Version;
use serde::Serialize;
use tracing::{debug, info};

pub use error::{NotifyError, NotifyResult};

const MESSAGE_TITLE: &str = "<font color=\"info\">【OSS Download Url】</font>\n";

/// Webhook message payload, `msgtype` fixed to markdown
#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    msgtype: &'static str,
    markdown: MarkdownContent,
}

#[derive(Debug, Serialize)]
struct MarkdownContent {
    content: String,
}

impl WebhookMessage {
    /// Builds the message body, one quoted line per signed link
    #[must_use]
    pub fn from_links(links: &BTreeMap<PathBuf, String>) -> Self {
        let mut content = String::from(MESSAGE_TITLE);
        for (path, url) in links {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            content.push_str(&format!("> {name} : [ click to download ]({url})\n"));
        }

        Self {
            msgtype: "markdown",
            markdown: MarkdownContent { content },
        }
    }

    #[cfg(test)]
    fn content(&self) -> &str {
        &self.markdown.content
    }
}

/// Posts Markdown notifications to a single webhook endpoint
pub struct Notifier {
    http: reqwest::Client,
    url: String,
}

impl Notifier {
    /// Creates a notifier for `url`.
    ///
    /// `skip_tls_verify` disables certificate verification, for endpoints
    /// whose certificates do not match their hostname. TLS 1.2 is the
    /// negotiation floor either way.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Http` when the HTTP client cannot be built.
    pub fn new(url: String, skip_tls_verify: bool) -> NotifyResult<Self> {
        let http = reqwest::Client::builder()
            .min_tls_version(Version::TLS_1_2)
            .danger_accept_invalid_certs(skip_tls_verify)
            .build()?;

        Ok(Self { http, url })
    }

    /// Delivers one notification for the collected links.
    ///
    /// Skips delivery (with a diagnostic) when no links were collected.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when serialization fails, the request cannot
    /// be sent, or the endpoint answers with a non-success status.
    pub async fn notify(&self, links: &BTreeMap<PathBuf, String>) -> NotifyResult<()> {
        if links.is_empty() {
            info!("no signed links collected, skipping webhook notification");
            return Ok(());
        }

        let message = WebhookMessage::from_links(links);
        let body = serde_json::to_vec(&message)?;
        debug!("posting notification with {} links to {}", links.len(), self.url);

        self.http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        info!("webhook notification delivered");
        Ok(())
    }
}
