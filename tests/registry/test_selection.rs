// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet-safe RPC selection tests

use chrono::Utc;
use fabstir_chain_registry::chains::url::is_wallet_safe;
use fabstir_chain_registry::chains::{ChainRecord, NativeCurrency};
use fabstir_chain_registry::health::{EndpointHealth, EndpointStatus, TrackingLevel};
use fabstir_chain_registry::merger::merge::with_health;
use fabstir_chain_registry::selector::{
    select_wallet_safe_endpoints, ProviderPatternTable, RpcSelector, SelectionTier,
    SelectorConfig,
};
use std::sync::Arc;

fn selector() -> RpcSelector {
    RpcSelector::with_table(
        SelectorConfig::default(),
        Arc::new(ProviderPatternTable::builtin().unwrap()),
    )
}

fn probed(url: &str, status: EndpointStatus, latency_ms: Option<u64>) -> EndpointHealth {
    EndpointHealth {
        url: url.to_string(),
        status,
        latency_ms,
        tracking: TrackingLevel::None,
        last_checked_at: Some(Utc::now()),
        reliability_score: Some(if status.is_reachable() { 100 } else { 0 }),
        privacy_score: Some(100),
        composite_score: None,
        detail: None,
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_official_online_endpoint_selected_first() {
        let rpcs = urls(&[
            "https://base.llamarpc.com",
            "https://mainnet.base.org",
            "https://base.publicnode.com",
        ]);
        let health = vec![
            probed("https://base.llamarpc.com", EndpointStatus::Online, Some(20)),
            probed("https://mainnet.base.org", EndpointStatus::Online, Some(50)),
            probed("https://base.publicnode.com", EndpointStatus::Online, Some(30)),
        ];

        let report = selector().rank(8453, &rpcs, &health, Utc::now());
        assert_eq!(report.tier, Some(SelectionTier::Official));
        assert_eq!(report.selected.first().map(String::as_str), Some("https://mainnet.base.org"));
    }

    #[test]
    fn test_unsafe_urls_never_selected() {
        let rpcs = urls(&[
            "http://rpc.example.org",
            "http://127.0.0.1:8545",
            "https://10.0.0.5/rpc",
            "https://localhost:8545",
            "https://mainnet.infura.io/v3/${INFURA_API_KEY}",
            "wss://ethereum.publicnode.com",
            "https://127.0.0.1.nip.io",
            "https://localhost.attacker.com/rpc",
            "https://10-0-0-1.sslip.io",
            "https://rpc.ankr.com/eth",
        ]);

        let report = selector().rank(1, &rpcs, &[], Utc::now());

        assert_eq!(report.selected, vec!["https://rpc.ankr.com/eth"]);
        assert_eq!(report.tier, Some(SelectionTier::Reliable));
        assert_eq!(report.rejected.len(), 9);
        for url in &report.selected {
            assert!(is_wallet_safe(url), "{} is not wallet safe", url);
        }
    }

    #[test]
    fn test_embedded_private_hosts_rejected_without_fallback() {
        let rpcs = urls(&["https://127.0.0.1.nip.io", "https://localhost.attacker.com/rpc"]);

        let report = selector().rank(777, &rpcs, &[], Utc::now());
        assert!(report.selected.is_empty());
        assert!(report.candidates.is_empty());
        assert_eq!(report.rejected.len(), 2);
    }

    #[test]
    fn test_lookalike_official_host_does_not_outrank_reliable_provider() {
        let rpcs = urls(&["https://eth.llamarpc.com", "https://rpc.evil-phish.xyz"]);

        let report = selector().rank(1, &rpcs, &[], Utc::now());
        assert_eq!(report.tier, Some(SelectionTier::Reliable));
        assert_eq!(report.selected, vec!["https://eth.llamarpc.com"]);
        assert!(!report.candidate("https://rpc.evil-phish.xyz").unwrap().official);
    }

    #[test]
    fn test_slow_official_endpoint_loses_to_online_reliable() {
        let rpcs = urls(&["https://mainnet.base.org", "https://base.llamarpc.com"]);
        let health = vec![
            probed("https://mainnet.base.org", EndpointStatus::Slow, Some(1500)),
            probed("https://base.llamarpc.com", EndpointStatus::Online, Some(40)),
        ];

        let report = selector().rank(8453, &rpcs, &health, Utc::now());
        assert_eq!(report.tier, Some(SelectionTier::Reliable));
        assert_eq!(report.selected, vec!["https://base.llamarpc.com"]);
    }

    #[test]
    fn test_all_offline_selects_nothing() {
        let rpcs = urls(&[
            "https://mainnet.optimism.io",
            "https://optimism.publicnode.com",
            "https://op.example.org",
        ]);
        let health: Vec<EndpointHealth> = rpcs
            .iter()
            .map(|u| probed(u, EndpointStatus::Offline, None))
            .collect();

        let report = selector().rank(10, &rpcs, &health, Utc::now());
        assert!(report.selected.is_empty());
        assert!(report.tier.is_none());
        assert!(report.is_no_safe_endpoint());
    }

    #[test]
    fn test_zero_rpc_chain_selects_nothing() {
        let chain = ChainRecord::new(
            31415,
            "No Endpoints",
            NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
        );
        let merged = with_health(chain, vec!["test".to_string()], Vec::new(), Utc::now());

        assert!(select_wallet_safe_endpoints(&merged).is_empty());
        assert_eq!(merged.completeness, 20);
    }

    #[test]
    fn test_unknown_health_falls_through_to_static_tier() {
        let rpcs = urls(&["https://node.unlisted-provider.com"]);
        let report = selector().rank(1, &rpcs, &[], Utc::now());

        assert_eq!(report.tier, Some(SelectionTier::StaticallySafe));
        assert_eq!(report.selected, rpcs);
    }
}
