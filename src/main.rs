// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_chain_registry::{config::RegistryConfig, pipeline::RegistryPipeline};
use std::env;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!(
        "Starting chain registry v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = RegistryConfig::from_env();
    let pipeline = RegistryPipeline::from_config(&config)?;

    // Fast pass publishes a snapshot before any probing; enrichment and the
    // first health refresh follow.
    let snapshot = pipeline.merger.run().await;
    let verified = snapshot.iter().filter(|c| c.chain.verified).count();
    let with_health = snapshot.iter().filter(|c| c.health.is_some()).count();
    info!(
        "Registry ready: {} chains, {} verified, {} with health data",
        snapshot.len(),
        verified,
        with_health
    );
    if snapshot.is_empty() {
        warn!("Registry snapshot is empty");
    }

    let refresh = pipeline
        .merger
        .spawn_background_refresh(config.refresh.interval());
    info!(
        "Background health refresh every {}s",
        config.refresh.interval_secs
    );

    signal::ctrl_c().await?;
    info!("Shutting down...");
    refresh.shutdown().await;

    Ok(())
}
