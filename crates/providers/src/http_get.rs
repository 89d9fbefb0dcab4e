//! Plain-text GET endpoint client.
//!
//! The endpoint contract is as small as it gets:
//!
//! ```text
//! GET <base_url>/<percent-encoded prompt>
//! Content-Type: text/plain
//! ```
//!
//! The whole response body is the reply. There is no JSON envelope, no
//! authentication and no retry. The only knob is the optional timeout.

use async_trait::async_trait;
use chatrelay_config::EndpointConfig;
use chatrelay_core::error::GenerationError;
use chatrelay_core::generation::TextGenerator;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for an endpoint that takes the prompt as the URL path.
pub struct HttpGenerationClient {
    base_url: String,
    timeout: Option<Duration>,
    client: reqwest::Client,
}

impl HttpGenerationClient {
    /// Create a client with no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Set the per-request timeout. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::new(&config.base_url).with_timeout(config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for `prompt`.
    fn request_url(&self, prompt: &str) -> Result<reqwest::Url, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("prompt is empty".into()));
        }

        let raw = format!("{}/{}", self.base_url, urlencoding::encode(prompt));
        reqwest::Url::parse(&raw).map_err(|e| {
            GenerationError::InvalidRequest(format!("bad endpoint URL '{}': {e}", self.base_url))
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            let after = self
                .timeout
                .map(|d| format!(" after {}ms", d.as_millis()))
                .unwrap_or_default();
            GenerationError::TransportFailed(format!("request timed out{after}"))
        } else {
            GenerationError::TransportFailed(e.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for HttpGenerationClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self.request_url(prompt)?;

        debug!(endpoint = %self.base_url, prompt_chars = prompt.len(), "Sending generation request");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Endpoint returned error");
            return Err(GenerationError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.trim().to_string())
    }
}
