//! Restock: run the low-stock mutation and log what changed

use super::client::GraphQLClient;
use super::error::{JobError, JobResult};
use super::log::{append_lines, timestamp};
use chrono::Local;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const UPDATE_LOW_STOCK: &str = r#"
mutation {
    updateLowStockProducts {
        products { name stock }
        message
        success
    }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    update_low_stock_products: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    products: Vec<RestockedProduct>,
    message: String,
    success: bool,
}

/// A product after restocking
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RestockedProduct {
    pub name: String,
    pub stock: i32,
}

/// Log lines for one run
pub fn restock_lines(timestamp: &str, message: &str, products: &[RestockedProduct]) -> Vec<String> {
    let mut lines = vec![format!("{} - {}", timestamp, message)];
    lines.extend(
        products
            .iter()
            .map(|p| format!("{}: stock {}", p.name, p.stock)),
    );
    lines
}

/// Restock low-stock products and append the outcome to `log`
pub async fn update_low_stock(client: &GraphQLClient, log: &Path) -> JobResult<Vec<RestockedProduct>> {
    let ts = timestamp(&Local::now());

    let payload = match client
        .execute::<Data>(UPDATE_LOW_STOCK, Value::Null)
        .await
    {
        Ok(data) => data.update_low_stock_products,
        Err(e) => {
            tracing::error!("low-stock update failed: {}", e);
            append_lines(log, &[format!("{} - Error: {}", ts, e)]).await?;
            return Err(e);
        }
    };

    append_lines(log, &restock_lines(&ts, &payload.message, &payload.products)).await?;

    if !payload.success {
        tracing::error!("low-stock update rejected: {}", payload.message);
        return Err(JobError::Rejected(payload.message));
    }

    tracing::info!(count = payload.products.len(), "low-stock products restocked");
    Ok(payload.products)
}
