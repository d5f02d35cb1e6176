//! Product entity

use rust_decimal::Decimal;

/// Products with stock strictly below this level count as low stock
pub const LOW_STOCK_THRESHOLD: i32 = 10;

crate::impl_data_entity!(
    /// A sellable item with a price and a stock level
    Product,
    "product",
    {
        name: String,
        /// Unit price, always positive
        price: Decimal,
        /// Units on hand, never negative
        stock: i32,
    }
);

impl Product {
    /// Whether the stock level is below the given threshold
    pub fn is_low_stock(&self, threshold: i32) -> bool {
        self.stock < threshold
    }
}
