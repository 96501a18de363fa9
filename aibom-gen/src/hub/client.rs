//! Hub HTTP client
//!
//! Thin wrapper over reqwest for the model hub's JSON API and raw-file
//! endpoints. A Bearer token is injected on every request when one is
//! configured; each request honours the per-request deadline (0 = unlimited).
//! Transport retries are out of scope: transient failures surface to the
//! caller.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

pub const DEFAULT_HUB_URL: &str = "https://huggingface.co";

/// Hub client errors, typed so callers can distinguish "not found" from
/// transient failures without string matching.
#[derive(Debug, Error)]
pub enum HubError {
    /// Repository does not exist (HTTP 404)
    #[error("hub resource not found")]
    NotFound,

    /// Private repo without a (valid) token (HTTP 401/403)
    #[error("hub request unauthorized")]
    Unauthorized,

    /// Hub throttled the request (HTTP 429)
    #[error("hub rate limit exceeded")]
    RateLimited,

    /// Other non-2xx response
    #[error("hub api status {0}")]
    Status(u16),

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Response body failed to decode
    #[error("decode error: {0}")]
    Decode(String),
}

impl HubError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HubError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HubError::Unauthorized)
    }
}

fn status_error(status: u16) -> HubError {
    match status {
        404 => HubError::NotFound,
        401 | 403 => HubError::Unauthorized,
        429 => HubError::RateLimited,
        other => HubError::Status(other),
    }
}

/// Client for hub endpoints.
pub struct HubClient {
    http: reqwest::Client,
    token: Option<String>,
    base_url: String,
}

impl HubClient {
    /// Create a client against `base_url` (empty = the public hub).
    ///
    /// `timeout` is the per-request deadline; zero means unlimited. The
    /// token is trimmed and dropped when empty.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, HubError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| HubError::Network(e.to_string()))?;

        let base = base_url.trim().trim_end_matches('/');
        let base_url = if base.is_empty() {
            DEFAULT_HUB_URL.to_string()
        } else {
            base.to_string()
        };

        let token = token.trim();
        let token = if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        };

        Ok(HubClient {
            http,
            token,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, path: &str, accept: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.get(url).header("Accept", accept);
        if let Some(token) = &self.token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    /// GET a JSON endpoint and decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HubError> {
        tracing::debug!(path = %path, "GET (json)");
        let resp = self
            .request(path, "application/json")
            .send()
            .await
            .map_err(|e| HubError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(path = %path, status = status.as_u16(), "non-2xx response");
            return Err(status_error(status.as_u16()));
        }

        resp.json::<T>()
            .await
            .map_err(|e| HubError::Decode(e.to_string()))
    }

    /// GET a raw-file endpoint and return the body as text.
    pub async fn get_raw(&self, path: &str) -> Result<String, HubError> {
        tracing::debug!(path = %path, "GET (raw)");
        let resp = self
            .request(path, "text/markdown, text/plain, */*")
            .send()
            .await
            .map_err(|e| HubError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(path = %path, status = status.as_u16(), "non-2xx response");
            return Err(status_error(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| HubError::Network(e.to_string()))
    }
}
