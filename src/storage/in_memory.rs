//! In-memory implementation of EntityStore for testing and development

use crate::core::entity::{Entity, EntityId};
use crate::core::error::{StorageError, StoreResult};
use crate::core::store::{EntityStore, ProductPredicate, StoreReader, StoreTransaction};
use crate::entities::{Customer, Order, Product};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

const BACKEND: &str = "memory";

/// One table per entity type plus its id sequence
#[derive(Debug, Clone)]
struct Table<T> {
    rows: IndexMap<EntityId, T>,
    next_id: EntityId,
}

impl<T: Entity> Table<T> {
    fn new() -> Self {
        Self {
            rows: IndexMap::new(),
            next_id: 1,
        }
    }

    fn insert(&mut self, mut entity: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(id);
        self.rows.insert(id, entity.clone());
        entity
    }

    fn replace(&mut self, entity: T) -> StoreResult<T> {
        let slot = self.rows.get_mut(&entity.id()).ok_or_else(|| {
            StorageError::IntegrityError {
                message: format!(
                    "{} with id {} does not exist",
                    T::resource_name_singular(),
                    entity.id()
                ),
            }
        })?;
        *slot = entity.clone();
        Ok(entity)
    }

    fn get(&self, id: EntityId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn list(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Debug, Clone)]
struct Tables {
    customers: Table<Customer>,
    products: Table<Product>,
    orders: Table<Order>,
}

impl Tables {
    fn new() -> Self {
        Self {
            customers: Table::new(),
            products: Table::new(),
            orders: Table::new(),
        }
    }

    fn products_by_ids(&self, ids: &[EntityId]) -> Vec<Product> {
        ids.iter()
            .filter_map(|id| self.products.get(*id))
            .collect()
    }

    fn products_where(&self, predicate: ProductPredicate<'_>) -> Vec<Product> {
        self.products
            .rows
            .values()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }
}

/// In-memory entity store
///
/// Transactions take the table write lock for their whole lifetime and work on
/// a private copy of the tables, which replaces the shared state on commit.
/// Writers are therefore serialized, and a dropped transaction leaves no trace.
///
/// Each `begin()` clones every table, so a write transaction costs O(n) in the
/// number of stored rows. Meant for tests and development, not large datasets.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreReader for InMemoryStore {
    async fn get_customer(&self, id: EntityId) -> StoreResult<Option<Customer>> {
        Ok(self.tables.read().await.customers.get(id))
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.tables.read().await.customers.list())
    }

    async fn get_product(&self, id: EntityId) -> StoreResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(id))
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.list())
    }

    async fn products_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products_by_ids(ids))
    }

    async fn products_where(&self, predicate: ProductPredicate<'_>) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products_where(predicate))
    }

    async fn get_order(&self, id: EntityId) -> StoreResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(id))
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.tables.read().await.orders.list())
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let guard = self.tables.clone().write_owned().await;
        let working = Tables::clone(&guard);

        Ok(Box::new(InMemoryTransaction { guard, working }))
    }
}

/// Transaction over an [`InMemoryStore`]
pub struct InMemoryTransaction {
    guard: OwnedRwLockWriteGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl StoreReader for InMemoryTransaction {
    async fn get_customer(&self, id: EntityId) -> StoreResult<Option<Customer>> {
        Ok(self.working.customers.get(id))
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.working.customers.list())
    }

    async fn get_product(&self, id: EntityId) -> StoreResult<Option<Product>> {
        Ok(self.working.products.get(id))
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.working.products.list())
    }

    async fn products_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Product>> {
        Ok(self.working.products_by_ids(ids))
    }

    async fn products_where(&self, predicate: ProductPredicate<'_>) -> StoreResult<Vec<Product>> {
        Ok(self.working.products_where(predicate))
    }

    async fn get_order(&self, id: EntityId) -> StoreResult<Option<Order>> {
        Ok(self.working.orders.get(id))
    }

    async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.working.orders.list())
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn insert_customer(&mut self, customer: Customer) -> StoreResult<Customer> {
        Ok(self.working.customers.insert(customer))
    }

    async fn insert_product(&mut self, product: Product) -> StoreResult<Product> {
        if product.stock < 0 {
            return Err(StorageError::IntegrityError {
                message: format!("product stock {} violates stock >= 0", product.stock),
            });
        }
        Ok(self.working.products.insert(product))
    }

    async fn update_product(&mut self, product: Product) -> StoreResult<Product> {
        if product.stock < 0 {
            return Err(StorageError::IntegrityError {
                message: format!("product stock {} violates stock >= 0", product.stock),
            });
        }
        self.working.products.replace(product)
    }

    async fn insert_order(&mut self, order: Order) -> StoreResult<Order> {
        if self.working.customers.get(order.customer_id).is_none() {
            return Err(StorageError::IntegrityError {
                message: format!("customer {} does not exist", order.customer_id),
            });
        }
        Ok(self.working.orders.insert(order))
    }

    async fn set_order_products(
        &mut self,
        order_id: EntityId,
        product_ids: &[EntityId],
    ) -> StoreResult<Order> {
        if let Some(missing) = product_ids
            .iter()
            .find(|id| self.working.products.get(**id).is_none())
        {
            return Err(StorageError::IntegrityError {
                message: format!("product {} does not exist", missing),
            });
        }

        let mut order = self
            .working
            .orders
            .get(order_id)
            .ok_or_else(|| StorageError::QueryError {
                backend: BACKEND.to_string(),
                message: format!("order {} does not exist", order_id),
            })?;

        let mut ids: Vec<EntityId> = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }

        order.product_ids = ids;
        order.touch();
        self.working.orders.replace(order)
    }

    async fn update_order(&mut self, order: Order) -> StoreResult<Order> {
        self.working.orders.replace(order)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
