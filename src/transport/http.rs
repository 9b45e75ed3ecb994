//! HTTP binding: POST the unframed payload as plain text.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use super::TransportError;

/// Reply from the HTTP endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// Status code
    pub status: u16,
    /// Canonical reason phrase, if known
    pub reason: String,
    /// Response body as text
    pub body: String,
}

impl HttpReply {
    /// Body pretty-printed when it is JSON, verbatim otherwise
    #[must_use]
    pub fn pretty_body(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|value| serde_json::to_string_pretty(&value).ok())
            .unwrap_or_else(|| self.body.clone())
    }

    /// 2xx status
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl fmt::Display for HttpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\n{}", self.status, self.reason, self.pretty_body())
    }
}

/// Blocking client for one HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpClient {
    url: String,
    client: Client,
}

impl HttpClient {
    /// Client posting to `url` with the given request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(url, client))
    }

    /// Client posting to `url` through a preconfigured `reqwest` client
    #[must_use]
    pub fn with_client(url: &str, client: Client) -> Self {
        Self {
            url: url.trim().to_string(),
            client,
        }
    }

    /// Target URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `payload` as `text/plain`. Any HTTP status is a reply, not an error.
    #[instrument(level = "debug", skip(self, payload), fields(url = %self.url, len = payload.len()))]
    pub fn post(&self, payload: &str) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(payload.to_string())
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    TransportError::Timeout
                } else {
                    TransportError::from(err)
                }
            })?;

        let status = response.status();
        let body = response.text()?;
        debug!(status = status.as_u16(), body_len = body.len(), "post complete");

        Ok(HttpReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
