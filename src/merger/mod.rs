// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical chain registry
//!
//! Combines fetched records, enrichment and endpoint health into a sorted,
//! immutable snapshot.

pub mod config;
pub mod loader;
pub mod merge;
pub mod service;
pub mod types;

pub use config::RefreshConfig;
pub use loader::RegistryLoader;
pub use merge::{completeness, merge_all};
pub use service::{ChainDataMerger, RefreshHandle};
pub use types::{MergeError, RegistryError};
