//! edgestack - One-shot topology construction for a containerized web service
//!
//! This is the composition root that wires together all the components.

mod adapters;
mod application;
mod config;
mod domain;

use crate::adapters::outbound::{
    InMemoryComputePlatform, InMemoryEdgePlatform, InMemoryIdentityPlatform,
    InMemoryNetworkProvider,
};
use crate::application::TopologyComposer;
use crate::config::load_config;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let ctx = load_config()?;

    // Setup logging
    let log_level = if ctx.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting edgestack build prefix={} listener_port={}",
        ctx.name_prefix,
        ctx.listener_port
    );

    // ===== COMPOSITION ROOT =====
    // Wire up the platform adapters and the composer

    // 1. Outbound adapters standing in for the external platforms
    let network = Arc::new(InMemoryNetworkProvider::new());
    let compute = Arc::new(InMemoryComputePlatform::new());
    let edge = Arc::new(InMemoryEdgePlatform::new());
    let identity = Arc::new(InMemoryIdentityPlatform::new());

    // 2. Application service
    let composer = TopologyComposer::new(network, compute, edge, identity);

    // 3. One-shot topology build
    let topology = composer.build(&ctx).await?;

    // 4. Surface the operator outputs
    let outputs = topology.outputs();
    tracing::info!("frontend address: {}", outputs.frontend_address);
    tracing::info!("distribution domain: {}", outputs.distribution_domain);
    tracing::info!("identity directory: {}", outputs.directory_id);
    tracing::info!("identity client: {}", outputs.client_id);

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}
