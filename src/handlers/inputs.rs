//! Mutation inputs as received from API callers

use async_graphql::{ID, InputObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields for a new customer
#[derive(Debug, Clone, Default, Serialize, Deserialize, InputObject)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    /// `+1234567890` or `123-456-7890`; empty means no phone
    pub phone: Option<String>,
}

impl CustomerInput {
    pub fn new(name: &str, email: &str, phone: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
        }
    }
}

/// Fields for a new product
#[derive(Debug, Clone, Serialize, Deserialize, InputObject)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    /// Defaults to 0
    pub stock: Option<i32>,
}

/// Fields for a new order
#[derive(Debug, Clone, Serialize, Deserialize, InputObject)]
pub struct OrderInput {
    pub customer_id: ID,
    pub product_ids: Vec<ID>,
    /// Defaults to the time of creation
    pub order_date: Option<DateTime<Utc>>,
}
