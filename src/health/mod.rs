// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RPC endpoint health probing
//!
//! Key features:
//! - Pre-flight rejection of unsafe URLs with no network I/O
//! - Per-URL rate limiting and TTL result caching
//! - Bounded-concurrency batch probing
//! - Tracking-level classification and composite scoring

pub mod cache;
pub mod config;
pub mod monitor;
pub mod privacy;
pub mod prober;
pub mod rate_limiter;
pub mod scoring;
pub mod transport;
pub mod types;

pub use config::HealthConfig;
pub use monitor::{ChainHealthReport, HealthMonitor};
pub use prober::RpcProber;
pub use transport::{ReqwestTransport, RpcTransport};
pub use types::{ChainHealthSummary, EndpointHealth, EndpointStatus, ProbeError, TrackingLevel};
