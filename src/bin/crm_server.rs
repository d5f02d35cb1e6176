//! Serve the CRM GraphQL API

use anyhow::Result;
use clap::Parser;
use crm::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "crm-server", about = "Serve the CRM GraphQL API")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the configuration)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = CrmConfig::load(args.config.as_deref())?;
    let addr = args.bind.unwrap_or_else(|| config.server.bind_addr.clone());

    tracing::info!(
        threshold = config.inventory.low_stock_threshold,
        increment = config.inventory.restock_increment,
        "starting CRM server"
    );

    ServerBuilder::new()
        .with_store(InMemoryStore::new())
        .with_config(&config)
        .serve(&addr)
        .await
}
