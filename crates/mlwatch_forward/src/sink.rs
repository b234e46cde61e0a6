//! Forwarding destinations.

use crate::error::{ForwardError, ForwardResult};
use crate::http::HttpClient;
use async_trait::async_trait;
use mlwatch_core::{EntryQueue, LogRecord};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Path the collector accepts batches on.
const POST_LOGS_PATH: &str = "/post_logs";

/// Status the collector answers an accepted batch with.
const CREATED: u16 = 201;

/// A destination for forwarded batches.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Delivers one non-empty batch.
    ///
    /// # Errors
    ///
    /// Returns a delivery error if the batch was not accepted.
    async fn deliver(&self, batch: Vec<LogRecord>) -> ForwardResult<()>;

    /// Short name used in log lines.
    fn name(&self) -> &'static str;
}

/// Buffers records for the in-process dashboard.
///
/// The dashboard is the only drainer of [`LocalSink::queue`].
#[derive(Debug, Clone)]
pub struct LocalSink {
    queue: Arc<EntryQueue>,
}

impl LocalSink {
    /// Creates a sink appending into `queue`.
    pub fn new(queue: Arc<EntryQueue>) -> Self {
        Self { queue }
    }

    /// The queue the dashboard drains.
    pub fn queue(&self) -> &Arc<EntryQueue> {
        &self.queue
    }
}

#[async_trait]
impl Sink for LocalSink {
    async fn deliver(&self, batch: Vec<LogRecord>) -> ForwardResult<()> {
        self.queue.push_many(batch);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Posts batches to a remote collector.
pub struct RemoteSink {
    base_url: String,
    client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for RemoteSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSink")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteSink {
    /// Validates `url` and checks once that the collector answers
    /// `GET <url>/` with 200.
    ///
    /// The check is not repeated; a collector that goes away later only
    /// causes dropped batches.
    ///
    /// # Errors
    ///
    /// - [`ForwardError::InvalidUrl`] if `url` is not an absolute http(s) URL
    /// - [`ForwardError::DashboardUnreachable`] on any other status or a
    ///   transport failure
    pub async fn connect(url: &str, client: Arc<dyn HttpClient>) -> ForwardResult<Self> {
        let base_url = normalize_base_url(url)?;

        let probe = format!("{base_url}/");
        let reason = match client.get_status(&probe).await {
            Ok(200) => None,
            Ok(status) => Some(format!("status {status}")),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            return Err(ForwardError::DashboardUnreachable {
                url: base_url,
                reason,
            });
        }

        info!(url = %base_url, "connected to remote collector");
        Ok(Self { base_url, client })
    }

    /// The collector base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Sink for RemoteSink {
    async fn deliver(&self, batch: Vec<LogRecord>) -> ForwardResult<()> {
        let url = format!("{}{POST_LOGS_PATH}", self.base_url);
        let body = json!({ "log": batch });

        match self.client.post_json(&url, &body).await {
            Ok(CREATED) => Ok(()),
            Ok(status) => Err(ForwardError::unexpected_status(status)),
            Err(e) => Err(ForwardError::Delivery {
                status: None,
                message: e.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

fn normalize_base_url(url: &str) -> ForwardResult<String> {
    let invalid = |reason: String| ForwardError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    Ok(url.trim_end_matches('/').to_string())
}
