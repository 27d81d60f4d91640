// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chain registry source trait definition

use async_trait::async_trait;

use crate::chains::types::ChainRecord;

use super::types::FetchError;

/// A remote feed of chain records
///
/// Sources are tried in priority order; a failing source is skipped and the
/// next one is consulted.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Download and parse every chain the source knows about
    ///
    /// Records are returned as parsed; validation happens in the fetcher.
    async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError>;

    /// Source name used in logs and record provenance
    fn name(&self) -> &'static str;

    /// Whether the source is configured
    fn is_available(&self) -> bool {
        true
    }

    /// Lower = consulted first, wins scalar field conflicts
    fn priority(&self) -> u8 {
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::types::NativeCurrency;

    struct MockSource;

    #[async_trait]
    impl ChainSource for MockSource {
        async fn fetch(&self) -> Result<Vec<ChainRecord>, FetchError> {
            Ok(vec![ChainRecord::new(
                1,
                "Ethereum",
                NativeCurrency {
                    name: "Ether".to_string(),
                    symbol: "ETH".to_string(),
                    decimals: 18,
                },
            )])
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_default_trait_methods() {
        let source = MockSource;
        assert!(source.is_available());
        assert_eq!(source.priority(), 100);
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }
}
