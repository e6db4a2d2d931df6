//! Fetch client for the upstream catalog API
//!
//! Performs a single logical GET-and-decode against the upstream,
//! masking a bounded number of transient failures (transport errors
//! and HTTP 5xx) with exponential backoff. Client errors and decode
//! failures are surfaced immediately and never retried.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::backoff::ExponentialBackoff;
use crate::config::UpstreamConfig;
use crate::error::FetchError;
use crate::models::{ListingEntry, ListingPage, PokemonDetail};

/// HTTP client with bounded retry over transient failures
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    base_url: String,
    max_attempts: u32,
    backoff: ExponentialBackoff,
}

impl FetchClient {
    /// Create a fetch client from the upstream configuration
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_attempts: config.retry.max_attempts.max(1),
            backoff: ExponentialBackoff::from_config(&config.retry),
        }
    }

    /// Fetch the first listing page, up to `limit` entries
    pub async fn fetch_pokemon_list(&self, limit: u32) -> Result<Vec<ListingEntry>, FetchError> {
        let url = format!("{}/pokemon?limit={}", self.base_url, limit);
        let page: ListingPage = self.get_json(&url).await?;
        Ok(page.results)
    }

    /// Fetch the detail payload at the given absolute URL
    pub async fn fetch_pokemon_detail(&self, url: &str) -> Result<PokemonDetail, FetchError> {
        self.get_json(url).await
    }

    /// Perform a GET and decode the JSON body into `T`
    ///
    /// Transient failures (transport errors, 5xx) are retried up to the
    /// configured attempt count, waiting out the backoff between
    /// attempts; the last transient error is returned on exhaustion.
    /// Any other non-success status and any decode failure fail
    /// immediately.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let mut last_err = FetchError::Network("no attempt made".to_string());

        for attempt in 0..self.max_attempts {
            debug!(url = url, attempt = attempt + 1, "Sending HTTP GET request");

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    let err = classify_transport_error(&e);
                    warn!(
                        url = url,
                        attempt = attempt + 1,
                        error = %err,
                        "Request failed, will retry"
                    );
                    last_err = err;
                    self.wait_before_retry(attempt).await;
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let err = FetchError::Server(status.as_u16());
                warn!(
                    url = url,
                    attempt = attempt + 1,
                    status = status.as_u16(),
                    "Server error, will retry"
                );
                last_err = err;
                self.wait_before_retry(attempt).await;
                continue;
            }

            if !status.is_success() {
                // Client errors are not masked
                warn!(url = url, status = status.as_u16(), "Unexpected status");
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            return serde_json::from_slice(&body).map_err(|e| {
                // Malformed payload is a contract violation, not transient
                error!(url = url, error = %e, "Failed to decode response");
                FetchError::Decode(e.to_string())
            });
        }

        Err(last_err)
    }

    /// Wait out the backoff for the given attempt, unless it was the last
    async fn wait_before_retry(&self, attempt: u32) {
        if attempt + 1 < self.max_attempts {
            tokio::time::sleep(self.backoff.duration(attempt)).await;
        }
    }
}

/// Map a reqwest transport error to a [`FetchError`]
fn classify_transport_error(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Network(err.to_string())
    }
}
