//! Weekly report: customer count, order count and revenue

use super::client::GraphQLClient;
use super::error::JobResult;
use super::log::{append_lines, timestamp};
use chrono::Local;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const REPORT_QUERY: &str = r#"
query GenerateCRMReport {
    customerCount
    orderCount
    totalRevenue
}
"#;

/// Figures for one report
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub customer_count: i64,
    pub order_count: i64,
    pub total_revenue: Decimal,
}

/// Two decimals with thousands separators: `1234567.5` becomes `1,234,567.50`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

pub fn report_line(timestamp: &str, data: &ReportData) -> String {
    format!(
        "{} - Report: {} customers, {} orders, ${} revenue",
        timestamp,
        data.customer_count,
        data.order_count,
        format_currency(data.total_revenue)
    )
}

/// Query the report figures and append the report line to `log`
pub async fn generate_crm_report(client: &GraphQLClient, log: &Path) -> JobResult<ReportData> {
    let ts = timestamp(&Local::now());

    match client.execute::<ReportData>(REPORT_QUERY, Value::Null).await {
        Ok(data) => {
            let line = report_line(&ts, &data);
            append_lines(log, std::slice::from_ref(&line)).await?;
            tracing::info!("{}", line);
            Ok(data)
        }
        Err(e) => {
            tracing::error!("report generation failed: {}", e);
            append_lines(log, &[format!("{} - Report generation failed: {}", ts, e)]).await?;
            Err(e)
        }
    }
}
