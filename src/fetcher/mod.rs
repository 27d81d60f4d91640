// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multi-source chain registry fetching
//!
//! Key features:
//! - Priority-ordered sources with failover
//! - Timeouts and exponential-backoff retries per request
//! - Record validation and deduplication by chain id
//! - TTL snapshot caching with a bundled fallback dataset

pub mod accumulator;
pub mod cache;
pub mod chainid_network;
pub mod chainlist;
pub mod config;
pub mod curated;
pub mod http;
pub mod raw;
pub mod service;
pub mod source;
pub mod types;
pub mod validate;

pub use accumulator::ChainAccumulator;
pub use chainid_network::ChainidNetworkSource;
pub use chainlist::ChainlistSource;
pub use config::FetcherConfig;
pub use curated::CuratedRegistrySource;
pub use http::HttpJsonClient;
pub use service::ChainRegistryFetcher;
pub use source::ChainSource;
pub use types::{FetchError, RegistrySnapshot, SnapshotOrigin, SourcedRecord};
