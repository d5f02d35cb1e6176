//! Run one scheduled CRM job; meant to be invoked from cron

use anyhow::Result;
use clap::{Parser, Subcommand};
use crm::config::CrmConfig;
use crm::jobs::{
    GraphQLClient, generate_crm_report, log_crm_heartbeat, send_order_reminders, update_low_stock,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "crm-jobs", about = "Run a scheduled CRM job")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// GraphQL endpoint (overrides the configuration)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    job: Job,
}

#[derive(Debug, Subcommand)]
enum Job {
    /// Log that the CRM is alive and check the API
    Heartbeat,
    /// Log orders placed in the reminder window
    OrderReminders,
    /// Restock low-stock products
    Restock,
    /// Log customer, order and revenue totals
    Report,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = CrmConfig::load(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        config.jobs.graphql_url = endpoint;
    }

    let jobs = &config.jobs;
    let client = GraphQLClient::from_config(jobs);

    match args.job {
        Job::Heartbeat => {
            log_crm_heartbeat(&client, &jobs.heartbeat_log).await?;
        }
        Job::OrderReminders => {
            send_order_reminders(&client, &jobs.order_reminders_log, jobs.reminder_window_days)
                .await?;
            println!("Order reminders processed!");
        }
        Job::Restock => {
            update_low_stock(&client, &jobs.low_stock_log).await?;
        }
        Job::Report => {
            generate_crm_report(&client, &jobs.report_log).await?;
        }
    }

    Ok(())
}
