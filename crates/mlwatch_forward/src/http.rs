//! HTTP client abstraction.
//!
//! The forwarder only needs two operations: a status probe and a JSON post.
//! Both are behind [`HttpClient`] so tests can substitute an in-process fake.

use crate::config::ForwarderConfig;
use crate::error::{ForwardError, ForwardResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Minimal HTTP client used by [`crate::RemoteSink`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `GET url` and returns the response status.
    async fn get_status(&self, url: &str) -> ForwardResult<u16>;

    /// Sends `POST url` with a JSON body and returns the response status.
    async fn post_json(&self, url: &str, body: &Value) -> ForwardResult<u16>;
}

/// Production client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Http`] if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> ForwardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForwardError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    /// Creates a client using the configured request timeout.
    ///
    /// # Errors
    ///
    /// See [`ReqwestClient::new`].
    pub fn from_config(config: &ForwarderConfig) -> ForwardResult<Self> {
        Self::new(config.request_timeout)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_status(&self, url: &str) -> ForwardResult<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForwardError::Http(e.to_string()))?;
        Ok(response.status().as_u16())
    }

    async fn post_json(&self, url: &str, body: &Value) -> ForwardResult<u16> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ForwardError::Http(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}
