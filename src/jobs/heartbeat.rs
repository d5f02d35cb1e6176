//! Heartbeat: record that the CRM is alive and check the GraphQL endpoint

use super::client::GraphQLClient;
use super::error::JobResult;
use super::log::{append_lines, heartbeat_timestamp};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct HelloData {
    hello: Option<String>,
}

/// Log lines for one heartbeat given the endpoint check result
pub fn heartbeat_lines(timestamp: &str, check: &JobResult<Option<String>>) -> Vec<String> {
    let status = match check {
        Ok(Some(hello)) if !hello.is_empty() => format!("GraphQL endpoint responsive: {}", hello),
        Ok(_) => "GraphQL endpoint check failed".to_string(),
        Err(e) => format!("GraphQL check error: {}", e),
    };

    vec![
        format!("{} CRM is alive", timestamp),
        format!("{} {}", timestamp, status),
    ]
}

/// Append a heartbeat to `log`
///
/// An unreachable or failing endpoint is recorded in the log, not returned;
/// only a log write failure is an error.
pub async fn log_crm_heartbeat(client: &GraphQLClient, log: &Path) -> JobResult<Vec<String>> {
    let ts = heartbeat_timestamp(&Local::now());

    let check = client
        .execute::<HelloData>("query { hello }", Value::Null)
        .await
        .map(|data| data.hello);
    if let Err(e) = &check {
        tracing::warn!(endpoint = client.endpoint(), "heartbeat check failed: {}", e);
    }

    let lines = heartbeat_lines(&ts, &check);
    append_lines(log, &lines).await?;
    Ok(lines)
}
