//! Entity store traits
//!
//! The core never talks to a persistence technology directly. It reads through
//! [`StoreReader`] and writes inside a [`StoreTransaction`] obtained from
//! [`EntityStore::begin`]. A transaction sees its own writes; nothing becomes
//! visible to others until [`StoreTransaction::commit`], and dropping an
//! uncommitted transaction discards its writes.
//!
//! Implementations may serialize transactions. Code holding an open
//! transaction must therefore read through the transaction, never through the
//! store itself.

use crate::core::entity::EntityId;
use crate::core::error::StoreResult;
use crate::entities::{Customer, Order, Product};
use async_trait::async_trait;

/// Predicate used by [`StoreReader::products_where`]
pub type ProductPredicate<'a> = &'a (dyn Fn(&Product) -> bool + Send + Sync);

/// Read operations shared by stores and transactions
#[async_trait]
pub trait StoreReader: Send + Sync {
    /// Get a customer by ID
    async fn get_customer(&self, id: EntityId) -> StoreResult<Option<Customer>>;

    /// List all customers in insertion order
    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;

    /// Get a product by ID
    async fn get_product(&self, id: EntityId) -> StoreResult<Option<Product>>;

    /// List all products in insertion order
    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    /// Batch lookup; unknown ids are skipped, so the result may be shorter
    async fn products_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Product>>;

    /// All products matching a predicate
    async fn products_where(&self, predicate: ProductPredicate<'_>) -> StoreResult<Vec<Product>>;

    /// Get an order by ID
    async fn get_order(&self, id: EntityId) -> StoreResult<Option<Order>>;

    /// List all orders in insertion order
    async fn list_orders(&self) -> StoreResult<Vec<Order>>;
}

/// A unit of work over the store
#[async_trait]
pub trait StoreTransaction: StoreReader {
    /// Insert a customer, assigning its id
    async fn insert_customer(&mut self, customer: Customer) -> StoreResult<Customer>;

    /// Insert a product, assigning its id
    async fn insert_product(&mut self, product: Product) -> StoreResult<Product>;

    /// Replace an existing product
    async fn update_product(&mut self, product: Product) -> StoreResult<Product>;

    /// Insert an order, assigning its id
    ///
    /// The order's customer must exist. Products are attached separately with
    /// [`set_order_products`](Self::set_order_products).
    async fn insert_order(&mut self, order: Order) -> StoreResult<Order>;

    /// Replace the products associated with an order
    async fn set_order_products(
        &mut self,
        order_id: EntityId,
        product_ids: &[EntityId],
    ) -> StoreResult<Order>;

    /// Replace an existing order
    async fn update_order(&mut self, order: Order) -> StoreResult<Order>;

    /// Make every write of this transaction visible
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Entry point to a storage backend
#[async_trait]
pub trait EntityStore: StoreReader {
    /// Start a transaction
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;
}
