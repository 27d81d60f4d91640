// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Operator CLI for inspecting the chain registry

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::chains::types::MergedChainRecord;
use crate::config::RegistryConfig;
use crate::merger::merge::with_health;
use crate::pipeline::RegistryPipeline;
use crate::selector::patterns::ProviderPatternTable;

/// Chain registry CLI
#[derive(Parser, Debug)]
#[command(name = "chain-registry")]
#[command(version)]
#[command(about = "Inspect chain registry sources, RPC health and wallet-safe selection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and merge every registry source
    Fetch(FetchArgs),

    /// Probe one or more RPC URLs
    Probe(ProbeArgs),

    /// Show the merged record for a chain
    Chain(ChainArgs),

    /// Select wallet-safe RPC endpoints for a chain
    Select(SelectArgs),

    /// Show the active provider pattern table
    Patterns(PatternsArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Number of chains to list
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Print the full snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// RPC URLs to probe
    #[arg(required = true)]
    pub urls: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// Chain ID (e.g., 8453 for Base)
    pub chain_id: u64,

    /// Probe the chain's endpoints before printing
    #[arg(long)]
    pub probe: bool,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Chain ID (e.g., 8453 for Base)
    pub chain_id: u64,

    /// Rank using static rules only
    #[arg(long)]
    pub no_probe: bool,

    /// Print the full selection report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Pattern table file (defaults to PROVIDER_PATTERNS_PATH, then the built-in table)
    #[arg(long, env = "PROVIDER_PATTERNS_PATH")]
    pub path: Option<PathBuf>,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => fetch(args).await,
        Commands::Probe(args) => probe(args).await,
        Commands::Chain(args) => chain(args).await,
        Commands::Select(args) => select(args).await,
        Commands::Patterns(args) => patterns(args),
    }
}

fn pipeline() -> Result<RegistryPipeline> {
    let config = RegistryConfig::from_env();
    Ok(RegistryPipeline::from_config(&config)?)
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let pipeline = pipeline()?;
    let snapshot = pipeline.fetcher.fetch_all().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
        return Ok(());
    }

    println!(
        "Fetched {} chains ({:?}) at {}",
        snapshot.len(),
        snapshot.origin,
        snapshot.fetched_at
    );
    if !snapshot.failed_sources.is_empty() {
        println!("Failed sources: {}", snapshot.failed_sources.join(", "));
    }
    println!();
    for sourced in snapshot.records.iter().take(args.limit) {
        println!(
            "{:>10}  {:<32} {:>3} rpc  [{}]",
            sourced.record.chain_id,
            sourced.record.name,
            sourced.record.rpc_urls.len(),
            sourced.sources.join(", ")
        );
    }
    Ok(())
}

async fn probe(args: ProbeArgs) -> Result<()> {
    let pipeline = pipeline()?;
    let results = pipeline.monitor.test_multiple_rpcs(&args.urls).await;

    for health in results {
        println!(
            "{:<8} {:>7} {:<8} score {:>3}  {}{}",
            format!("{:?}", health.status).to_lowercase(),
            health
                .latency_ms
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_else(|| "-".to_string()),
            format!("{:?}", health.tracking).to_lowercase(),
            health
                .composite_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            health.url,
            health
                .detail
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        );
    }
    Ok(())
}

async fn load_chain(pipeline: &RegistryPipeline, chain_id: u64, probe: bool) -> Result<MergedChainRecord> {
    pipeline.merger.fast_pass().await;
    let record = pipeline
        .merger
        .get(chain_id)
        .ok_or_else(|| anyhow!("Chain {} not found in registry", chain_id))?;

    if !probe {
        return Ok(record);
    }

    let report = pipeline.monitor.check_chain(&record.chain).await;
    Ok(with_health(record.chain, record.sources, report.endpoints, Utc::now()))
}

async fn chain(args: ChainArgs) -> Result<()> {
    let pipeline = pipeline()?;
    let record = load_chain(&pipeline, args.chain_id, args.probe).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn select(args: SelectArgs) -> Result<()> {
    let pipeline = pipeline()?;
    let record = load_chain(&pipeline, args.chain_id, !args.no_probe).await?;
    let report = pipeline.selector.report(&record);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} (chain {})", record.name(), record.chain_id());
    println!("Health data: {:?}", report.health);
    match report.tier {
        Some(tier) => println!("Selected by tier {} ({:?}):", tier.number(), tier),
        None => println!("No wallet-safe endpoint found; do not auto-register this network"),
    }
    for url in &report.selected {
        println!("  {}", url);
    }

    if !report.candidates.is_empty() {
        println!("\nCandidates:");
        for candidate in &report.candidates {
            println!(
                "  {:>4} {:<12} {:<8} {}",
                candidate.score,
                format!("{:?}", candidate.classification).to_lowercase(),
                format!("{:?}", candidate.status).to_lowercase(),
                candidate.url
            );
        }
    }
    if !report.rejected.is_empty() {
        println!("\nRejected:");
        for rejected in &report.rejected {
            println!("  {} ({})", rejected.url, rejected.reason);
        }
    }
    Ok(())
}

fn patterns(args: PatternsArgs) -> Result<()> {
    let table = match args.path {
        Some(path) => ProviderPatternTable::load(&path)?,
        None => ProviderPatternTable::builtin()?,
    };

    println!("Provider pattern table v{}", table.version());
    println!("Generic official patterns: {}", table.generic_pattern_count());
    println!("Reliable domains: {}", table.reliable_domains().join(", "));
    println!();
    for (chain_id, official, ceiling) in table.chain_entries() {
        println!(
            "{:>10}  {} official pattern(s), latency ceiling {}",
            chain_id,
            official,
            ceiling
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_else(|| "default".to_string())
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_command() {
        let cli = Cli::try_parse_from(["chain-registry", "select", "8453", "--no-probe"]).unwrap();
        match cli.command {
            Commands::Select(args) => {
                assert_eq!(args.chain_id, 8453);
                assert!(args.no_probe);
                assert!(!args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_probe_requires_urls() {
        assert!(Cli::try_parse_from(["chain-registry", "probe"]).is_err());
    }

    #[test]
    fn test_patterns_command_with_builtin_table() {
        assert!(patterns(PatternsArgs { path: None }).is_ok());
    }
}
