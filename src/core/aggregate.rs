//! Aggregate calculations over related entities

use crate::core::error::StoreResult;
use crate::core::store::StoreReader;
use crate::entities::{Order, Product};
use rust_decimal::Decimal;

/// Sum of the prices of the given products; zero when there are none
pub fn compute_order_total(products: &[Product]) -> Decimal {
    products.iter().map(|p| p.price).sum()
}

/// Total of an order from the current prices of its associated products
///
/// Evaluated at call time against `reader`; nothing is cached on the order.
pub async fn order_total<R>(reader: &R, order: &Order) -> StoreResult<Decimal>
where
    R: StoreReader + ?Sized,
{
    let products = reader.products_by_ids(&order.product_ids).await?;
    Ok(compute_order_total(&products))
}

/// Sum of the stored totals of the given orders
pub fn total_revenue(orders: &[Order]) -> Decimal {
    orders.iter().map(|o| o.total_amount).sum()
}
