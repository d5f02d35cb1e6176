//! Scheduled jobs that call the CRM over its GraphQL API
//!
//! Each job is one async function: build a [`GraphQLClient`], run a single
//! query or mutation, append timestamped lines to the job's log file. The
//! schedule itself belongs to cron (see the `crm-jobs` binary).

pub mod client;
pub mod error;
pub mod heartbeat;
pub mod log;
pub mod order_reminders;
pub mod report;
pub mod restock;

pub use client::GraphQLClient;
pub use error::{JobError, JobResult};
pub use heartbeat::log_crm_heartbeat;
pub use order_reminders::send_order_reminders;
pub use report::generate_crm_report;
pub use restock::update_low_stock;
