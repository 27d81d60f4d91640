// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON-over-HTTP client with timeout and exponential backoff

use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::FetchError;

/// Run `op` up to `max_retries + 1` times, sleeping `base_delay * 2^attempt`
/// between retryable failures
pub async fn retry_with_backoff<T, F, Fut>(
    label: &str,
    max_retries: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                let delay = base_delay.saturating_mul(2u32.saturating_pow(attempt));
                warn!(
                    "{} attempt {}/{} failed: {}, retrying in {}ms",
                    label,
                    attempt + 1,
                    max_retries + 1,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// HTTP client for registry and enrichment sources
#[derive(Clone)]
pub struct HttpJsonClient {
    client: Client,
    timeout_ms: u64,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpJsonClient {
    pub fn new(timeout: Duration, max_retries: u32, base_delay: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fabstir-chain-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network {
                source_name: "http-client".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            timeout_ms: timeout.as_millis() as u64,
            max_retries,
            base_delay,
        })
    }

    /// GET a JSON document, retrying transient failures
    pub async fn get_json(&self, source_name: &str, url: &str) -> Result<serde_json::Value, FetchError> {
        retry_with_backoff(source_name, self.max_retries, self.base_delay, || {
            self.get_once(source_name, url)
        })
        .await
    }

    /// GET a JSON document where 404 means "nothing here"
    pub async fn get_optional_json(
        &self,
        source_name: &str,
        url: &str,
    ) -> Result<Option<serde_json::Value>, FetchError> {
        match self.get_json(source_name, url).await {
            Ok(value) => Ok(Some(value)),
            Err(FetchError::HttpStatus { status: 404, .. }) => {
                debug!("{} has no document at {}", source_name, url);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_once(&self, source_name: &str, url: &str) -> Result<serde_json::Value, FetchError> {
        debug!("Fetching {} from {}", source_name, url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(source_name, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                source_name: source_name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(source_name, e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Parse {
            source_name: source_name.to_string(),
            message: format!("JSON parse error: {}", e),
        })
    }

    fn transport_error(&self, source_name: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                source_name: source_name.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            FetchError::Network {
                source_name: source_name.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn timeout_error() -> FetchError {
        FetchError::Timeout {
            source_name: "test".to_string(),
            timeout_ms: 10,
        }
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff("test", 2, Duration::from_millis(1), || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(timeout_error())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), FetchError> =
            retry_with_backoff("test", 2, Duration::from_millis(1), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(timeout_error()) }
            })
            .await;

        assert!(matches!(result, Err(FetchError::Timeout { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_parse_errors_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), FetchError> =
            retry_with_backoff("test", 2, Duration::from_millis(1), || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(FetchError::Parse {
                        source_name: "test".to_string(),
                        message: "bad".to_string(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backoff_grows_exponentially() {
        let start = std::time::Instant::now();
        let _: Result<(), FetchError> =
            retry_with_backoff("test", 2, Duration::from_millis(20), || async {
                Err(timeout_error())
            })
            .await;

        // 20ms + 40ms of sleeping between three attempts
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_client_creation() {
        let client =
            HttpJsonClient::new(Duration::from_secs(5), 2, Duration::from_millis(100)).unwrap();
        assert_eq!(client.timeout_ms, 5000);
        assert_eq!(client.max_retries, 2);
    }
}
