//! Order entity

use crate::core::entity::EntityId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

crate::impl_data_entity!(
    /// A customer's purchase of one or more products
    ///
    /// `total_amount` is a snapshot of the product prices taken when the order
    /// was created; it does not follow later price changes.
    Order,
    "order",
    {
        /// Owning customer
        customer_id: EntityId,
        /// Associated products (set semantics, no duplicates)
        product_ids: Vec<EntityId>,
        total_amount: Decimal,
        order_date: DateTime<Utc>,
    }
);

impl Order {
    /// Start an order for a customer, with no products yet
    pub fn for_customer(customer_id: EntityId, order_date: Option<DateTime<Utc>>) -> Self {
        Self::new(
            customer_id,
            Vec::new(),
            Decimal::ZERO,
            order_date.unwrap_or_else(Utc::now),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_customer_starts_empty() {
        let order = Order::for_customer(3, None);
        assert_eq!(order.customer_id, 3);
        assert!(order.product_ids.is_empty());
        assert_eq!(order.total_amount, Decimal::ZERO);
        assert_eq!(order.id, 0);
    }
}
