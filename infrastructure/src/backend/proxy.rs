//! Transparent request relay to the assistant backend.
//!
//! The proxy is deliberately dumb: it POSTs an already-serialized JSON
//! body to `{base_url}/{sub_path}` and hands back the backend's parsed
//! JSON body unchanged. It performs no retries and no interpretation of
//! the payload. Every failure mode — connection refused, timeout,
//! non-success status, undecodable body — collapses into [`ProxyError`],
//! whose caller-facing surface is a fixed `{"error": ...}` body with a
//! 500-equivalent status.

use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// The structured failure message returned for every proxy failure.
pub const FAILURE_MESSAGE: &str = "Failed to communicate with backend service";

/// Errors crossing the proxy boundary
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Network-level failure reaching the backend.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend reachable but returned a non-success status.
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend returned a body that is not valid JSON.
    #[error("Undecodable backend response: {0}")]
    Decode(String),
}

impl ProxyError {
    /// The JSON body surfaced to callers, regardless of the underlying
    /// failure mode.
    pub fn failure_body(&self) -> Value {
        json!({ "error": FAILURE_MESSAGE })
    }

    /// The HTTP-equivalent status surfaced to callers.
    pub fn status(&self) -> u16 {
        500
    }
}

/// Stateless relay for backend requests.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a proxy client for the given backend base URL
    /// (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a logical sub-path like `conversation/start`.
    pub fn endpoint_url(&self, sub_path: &str) -> String {
        format!("{}/{}", self.base_url, sub_path.trim_start_matches('/'))
    }

    /// Forward a JSON body to the backend and return its parsed JSON
    /// reply unchanged.
    pub async fn forward(&self, sub_path: &str, body: Value) -> Result<Value, ProxyError> {
        let url = self.endpoint_url(sub_path);
        debug!(%url, "Forwarding request to backend");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_base_and_sub_path() {
        let proxy = ProxyClient::new("http://localhost:3000/api");
        assert_eq!(
            proxy.endpoint_url("conversation/start"),
            "http://localhost:3000/api/conversation/start"
        );
    }

    #[test]
    fn endpoint_url_normalizes_slashes() {
        let proxy = ProxyClient::new("http://localhost:3000/api/");
        assert_eq!(
            proxy.endpoint_url("/conversation/message"),
            "http://localhost:3000/api/conversation/message"
        );
    }

    #[test]
    fn every_failure_mode_maps_to_the_same_structured_surface() {
        let errors = [
            ProxyError::Transport("connection refused".into()),
            ProxyError::Status {
                status: 502,
                body: "bad gateway".into(),
            },
            ProxyError::Decode("expected value".into()),
        ];
        for e in errors {
            assert_eq!(e.status(), 500);
            assert_eq!(e.failure_body(), json!({ "error": FAILURE_MESSAGE }));
        }
    }
}
