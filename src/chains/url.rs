// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static URL safety checks
//!
//! Used by the fetcher (syntactic validation of registry URLs), the prober
//! (pre-flight rejection before any I/O) and the selector (wallet safety gate).
//! None of these functions touch the network.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::{Host, Url};

/// Fragments that mark an RPC URL as an unfilled template
const PLACEHOLDER_MARKERS: &[&str] = &[
    "${", "{", "}", "%7b", "%7d", "<", ">", "%3c", "%3e", "your_api_key", "your-api-key",
    "api_key", "apikey}", "your_key", "<key>", "[api",
];

/// Why a URL was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsafeUrl {
    #[error("URL could not be parsed")]
    Unparseable,
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("local or private address: {0}")]
    PrivateHost(String),
    #[error("unresolved template placeholder")]
    TemplatePlaceholder,
}

/// Syntactic validity for registry records: http(s) or ws(s) with a host
pub fn is_valid_rpc_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https" | "ws" | "wss") && url.host_str().is_some()
        }
        Err(_) => false,
    }
}

/// True if the raw string still contains an unfilled template such as
/// `${INFURA_API_KEY}` or `<your-key>`
pub fn has_template_placeholder(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// True for localhost, loopback, private, link-local and unspecified hosts
pub fn is_private_host(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => url.host().map(|h| host_is_private(&h)).unwrap_or(false),
        // Fall back to a textual scan so unparseable strings are still caught
        Err(_) => {
            let lower = raw.to_lowercase();
            lower.contains("localhost") || lower.contains("127.0.0.1") || lower.contains("0.0.0.0")
        }
    }
}

pub fn is_https(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}

/// Lowercased hostname of a URL
pub fn hostname(raw: &str) -> Option<String> {
    Url::parse(raw.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_end_matches('.').to_lowercase()))
}

/// Pre-flight check for a URL we are about to probe over HTTP
pub fn check_probe_url(raw: &str) -> Result<Url, UnsafeUrl> {
    if has_template_placeholder(raw) {
        return Err(UnsafeUrl::TemplatePlaceholder);
    }

    let url = Url::parse(raw.trim()).map_err(|_| UnsafeUrl::Unparseable)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UnsafeUrl::UnsupportedScheme(url.scheme().to_string()));
    }

    let host = url.host().ok_or(UnsafeUrl::MissingHost)?;
    if host_is_private(&host) {
        return Err(UnsafeUrl::PrivateHost(host.to_string()));
    }

    Ok(url)
}

/// Static wallet safety: https, public host, no placeholders
pub fn is_wallet_safe(raw: &str) -> bool {
    is_https(raw) && check_probe_url(raw).is_ok()
}

fn host_is_private(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain_is_private(domain),
        Host::Ipv4(ip) => ipv4_is_private(ip),
        Host::Ipv6(ip) => ipv6_is_private(ip),
    }
}

/// Local names, plus wildcard-DNS names such as `127.0.0.1.nip.io` or
/// `10-0-0-1.sslip.io` that embed a private address
fn domain_is_private(domain: &str) -> bool {
    let domain = domain.trim_end_matches('.').to_lowercase();
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.iter().any(|label| *label == "localhost") || domain.ends_with(".local") {
        return true;
    }

    // Dotted form spread over four consecutive labels
    let dotted = labels
        .windows(4)
        .filter_map(|quad| parse_octets(quad.iter().copied()));

    // Dashed form inside a single label, e.g. `ip-192-168-1-1`
    let dashed = labels.iter().flat_map(|label| {
        let parts: Vec<&str> = label.split('-').collect();
        parts
            .windows(4)
            .filter_map(|quad| parse_octets(quad.iter().copied()))
            .collect::<Vec<_>>()
    });

    dotted.chain(dashed).any(|ip| ipv4_is_private(&ip))
}

fn parse_octets<'a>(parts: impl Iterator<Item = &'a str>) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut count = 0;
    for (slot, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
        count += 1;
    }
    (count == 4).then(|| Ipv4Addr::from(octets))
}

fn ipv4_is_private(ip: &Ipv4Addr) -> bool {
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // 100.64.0.0/10 carrier-grade NAT
        || (ip.octets()[0] == 100 && (ip.octets()[1] & 0xc0) == 64)
}

fn ipv6_is_private(ip: &Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return ipv4_is_private(&mapped);
    }
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}

/// Classify an address literal outside of a URL
pub fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => ipv4_is_private(v4),
        IpAddr::V6(v6) => ipv6_is_private(v6),
    }
}
