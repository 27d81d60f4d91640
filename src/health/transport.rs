// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP transport used by the prober
//!
//! Kept behind a trait so probes can be counted and delayed in tests.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::ProbeError;

/// Sends a JSON-RPC request and reports the HTTP status code
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// POST `body` to `url`, returning the response status
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, ProbeError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Create a transport whose requests give up after `timeout`
    ///
    /// Redirects are not followed: a redirect could point a probe at a
    /// private address that pre-flight validation never saw.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("fabstir-chain-registry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProbeError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl RpcTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, ProbeError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProbeError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ProbeError::Network(e.to_string())
                }
            })?;

        Ok(response.status().as_u16())
    }
}
