//! # HTTP Client
//!
//! Shared reqwest client for every HTTP-backed quote source and the rate
//! feed. One client per process, so connections are pooled across sources.
//!
//! Every failure is folded into a [`SourceError`] so the collector can
//! record it against the source without knowing the transport.

use crate::infrastructure::sources::error::{SourceError, SourceResult};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Longest response body echoed into an error message.
const MAX_ERROR_BODY: usize = 256;

/// Pooled JSON-over-HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Builds a client whose requests give up after `timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Internal` if the TLS backend cannot start.
    pub fn new(timeout_ms: u64) -> SourceResult<Self> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::internal(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Sends `GET url?query` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// `Timeout` or `Connection` for transport failures, `Unsupported` for
    /// 404/422 (the source does not price this corridor), `Status` for any
    /// other non-2xx and `MalformedPayload` for an undecodable body.
    pub async fn get_with_params<T, Q>(&self, url: &str, query: &Q) -> SourceResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        debug!(url, %status, "source responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::malformed_payload(format!("undecodable body: {e}")))
    }

    fn transport_error(&self, error: &reqwest::Error) -> SourceError {
        if error.is_timeout() {
            let ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            SourceError::timeout_with_duration("no response in time", ms)
        } else if error.is_decode() {
            SourceError::malformed_payload(error.to_string())
        } else {
            SourceError::connection(error.to_string())
        }
    }
}

fn status_error(status: StatusCode, body: &str) -> SourceError {
    let body: String = body.chars().take(MAX_ERROR_BODY).collect();
    match status {
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            SourceError::unsupported(format!("{status}: {body}"))
        }
        _ => SourceError::status(status.as_u16(), body),
    }
}
