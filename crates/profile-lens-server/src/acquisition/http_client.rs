//! Async HTTP client wrapping reqwest.
//!
//! Not a browser: one GET per lookup, no retries. The user agent matters:
//! both platforms serve stripped or blocked pages to default client
//! identifiers.

use anyhow::Result;
use profile_lens::TransportError;
use std::time::Duration;

/// Desktop browser identification sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Body of a successful (2xx) GET.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub body: String,
}

/// HTTP client for profile page fetches.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client sending `user_agent`.
    ///
    /// With `timeout_ms` unset no request timeout is configured and the
    /// transport defaults apply.
    pub fn new(user_agent: &str, timeout_ms: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent);
        if let Some(ms) = timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Perform a single GET and return the body of a 2xx response.
    ///
    /// Non-2xx statuses map to [`TransportError::Status`]; connection
    /// failures, timeouts, and unreadable bodies map to
    /// [`TransportError::Fetch`].
    pub async fn fetch(&self, url: &str) -> Result<RawPage, TransportError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "profile fetch failed");
            TransportError::Fetch(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "platform returned non-success status");
            return Err(TransportError::Status(status.as_u16()));
        }

        let final_url = resp.url().clone();
        let body = resp.text().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "failed to read profile body");
            TransportError::Fetch(e.to_string())
        })?;

        tracing::debug!(%url, %final_url, bytes = body.len(), "fetched profile page");

        Ok(RawPage { body })
    }
}
