//! Order reminders: list recent orders with their customer emails

use super::client::GraphQLClient;
use super::error::{JobError, JobResult};
use super::log::{append_lines, timestamp};
use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

const PAGE_SIZE: usize = 100;

const RECENT_ORDERS: &str = r#"
query RecentOrders($since: NaiveDate!, $first: Int!, $offset: Int!) {
    allOrders(filter: { orderDateGte: $since }, orderBy: ["order_date"], first: $first, offset: $offset) {
        items {
            id
            customer { email }
        }
        hasNextPage
    }
}
"#;

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "allOrders")]
    all_orders: Connection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    items: Vec<OrderRow>,
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
struct OrderRow {
    id: String,
    customer: CustomerRow,
}

#[derive(Debug, Deserialize)]
struct CustomerRow {
    email: String,
}

/// A recent order and the address a reminder goes to
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub order_id: String,
    pub email: String,
}

async fn fetch_reminders(client: &GraphQLClient, since: NaiveDate) -> JobResult<Vec<Reminder>> {
    let mut reminders = Vec::new();
    let mut offset = 0;

    loop {
        let variables = json!({
            "since": since.format("%Y-%m-%d").to_string(),
            "first": PAGE_SIZE,
            "offset": offset,
        });
        let data: Data = client.execute(RECENT_ORDERS, variables).await?;

        reminders.extend(data.all_orders.items.into_iter().map(|row| Reminder {
            order_id: row.id,
            email: row.customer.email,
        }));

        if !data.all_orders.has_next_page {
            return Ok(reminders);
        }
        offset += PAGE_SIZE;
    }
}

/// First day of the reminder window, or `None` when it falls outside the calendar
fn window_start(now: DateTime<Local>, window_days: i64) -> Option<NaiveDate> {
    if window_days < 0 {
        return None;
    }
    let window = Duration::try_days(window_days)?;
    now.checked_sub_signed(window).map(|start| start.date_naive())
}

/// Log lines for a successful run
pub fn reminder_lines(timestamp: &str, reminders: &[Reminder]) -> Vec<String> {
    let mut lines = vec![format!("[{}] Processing order reminders", timestamp)];
    lines.extend(
        reminders
            .iter()
            .map(|r| format!("Order ID: {}, Customer Email: {}", r.order_id, r.email)),
    );
    lines
}

/// Log every order placed in the last `window_days` days
///
/// On failure the error is logged as `[ts] Error: ...` and returned.
pub async fn send_order_reminders(
    client: &GraphQLClient,
    log: &Path,
    window_days: i64,
) -> JobResult<Vec<Reminder>> {
    let now = Local::now();
    let ts = timestamp(&now);

    let result = match window_start(now, window_days) {
        Some(since) => fetch_reminders(client, since).await,
        None => Err(JobError::WindowOutOfRange(window_days)),
    };

    match result {
        Ok(reminders) => {
            append_lines(log, &reminder_lines(&ts, &reminders)).await?;
            tracing::info!(count = reminders.len(), "order reminders processed");
            Ok(reminders)
        }
        Err(e) => {
            tracing::error!("order reminders failed: {}", e);
            append_lines(log, &[format!("[{}] Error: {}", ts, e)]).await?;
            Err(e)
        }
    }
}
