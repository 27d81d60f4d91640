// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chain data model and static URL rules

pub mod fallback;
pub mod types;
pub mod url;

pub use fallback::{bundled_dataset, minimal_chain, FallbackDataset, FALLBACK_SOURCE};
pub use types::{
    Bridge, ChainRecord, ChainStatus, Explorer, MergedChainRecord, NativeCurrency, ParentChain,
    ParentKind,
};
pub use url::UnsafeUrl;
