//! Tests for the mutation handlers and read queries
//!
//! These tests verify that:
//! - Every handler returns a result record with the documented messages
//! - Bulk imports report per-row failures and survive a failing store
//! - Orders are created atomically with a derived total
//! - Low-stock remediation re-evaluates the threshold on every call

use async_graphql::ID;
use crm::core::error::StoreResult;
use crm::core::store::ProductPredicate;
use crm::prelude::*;
use rust_decimal_macros::dec;
use std::sync::Mutex;

// =============================================================================
// Test store wrapper
// =============================================================================

/// Wraps an in-memory store, recording transactional write calls and optionally
/// failing every commit
#[derive(Clone, Default)]
struct RecordingStore {
    inner: InMemoryStore,
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail_commit: bool,
}

impl RecordingStore {
    fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

struct RecordingTransaction {
    inner: Box<dyn StoreTransaction>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail_commit: bool,
}

impl RecordingTransaction {
    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

macro_rules! delegate_reader {
    ($ty:ty) => {
        #[async_trait]
        impl StoreReader for $ty {
            async fn get_customer(&self, id: EntityId) -> StoreResult<Option<Customer>> {
                self.inner.get_customer(id).await
            }
            async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
                self.inner.list_customers().await
            }
            async fn get_product(&self, id: EntityId) -> StoreResult<Option<Product>> {
                self.inner.get_product(id).await
            }
            async fn list_products(&self) -> StoreResult<Vec<Product>> {
                self.inner.list_products().await
            }
            async fn products_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Product>> {
                self.inner.products_by_ids(ids).await
            }
            async fn products_where(
                &self,
                predicate: ProductPredicate<'_>,
            ) -> StoreResult<Vec<Product>> {
                self.inner.products_where(predicate).await
            }
            async fn get_order(&self, id: EntityId) -> StoreResult<Option<Order>> {
                self.inner.get_order(id).await
            }
            async fn list_orders(&self) -> StoreResult<Vec<Order>> {
                self.inner.list_orders().await
            }
        }
    };
}

delegate_reader!(RecordingStore);
delegate_reader!(RecordingTransaction);

#[async_trait]
impl EntityStore for RecordingStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(RecordingTransaction {
            inner: self.inner.begin().await?,
            calls: self.calls.clone(),
            fail_commit: self.fail_commit,
        }))
    }
}

#[async_trait]
impl StoreTransaction for RecordingTransaction {
    async fn insert_customer(&mut self, customer: Customer) -> StoreResult<Customer> {
        self.record("insert_customer");
        self.inner.insert_customer(customer).await
    }

    async fn insert_product(&mut self, product: Product) -> StoreResult<Product> {
        self.record("insert_product");
        self.inner.insert_product(product).await
    }

    async fn update_product(&mut self, product: Product) -> StoreResult<Product> {
        self.record("update_product");
        self.inner.update_product(product).await
    }

    async fn insert_order(&mut self, order: Order) -> StoreResult<Order> {
        self.record("insert_order");
        self.inner.insert_order(order).await
    }

    async fn set_order_products(
        &mut self,
        order_id: EntityId,
        product_ids: &[EntityId],
    ) -> StoreResult<Order> {
        self.record("set_order_products");
        self.inner.set_order_products(order_id, product_ids).await
    }

    async fn update_order(&mut self, order: Order) -> StoreResult<Order> {
        self.record("update_order");
        self.inner.update_order(order).await
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.record("commit");
        if self.fail_commit {
            return Err(StorageError::QueryError {
                backend: "recording".to_string(),
                message: "disk full".to_string(),
            });
        }
        self.inner.commit().await
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn service() -> CrmService {
    CrmService::new(Arc::new(InMemoryStore::new()))
}

fn product_input(name: &str, price: Decimal, stock: Option<i32>) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        price,
        stock,
    }
}

fn order_input(customer_id: &str, product_ids: &[&str]) -> OrderInput {
    OrderInput {
        customer_id: ID(customer_id.to_string()),
        product_ids: product_ids.iter().map(|id| ID(id.to_string())).collect(),
        order_date: None,
    }
}

async fn seed_customer(service: &CrmService, name: &str) -> Customer {
    service
        .try_create_customer(CustomerInput::new(
            name,
            &format!("{}@example.com", name.to_lowercase()),
            None,
        ))
        .await
        .unwrap()
}

async fn seed_product(service: &CrmService, name: &str, price: Decimal, stock: i32) -> Product {
    service
        .try_create_product(product_input(name, price, Some(stock)))
        .await
        .unwrap()
}

// =============================================================================
// CreateCustomer
// =============================================================================

mod create_customer_tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_customer() {
        let service = service();
        let response = service
            .create_customer(CustomerInput::new("Alice", "alice@example.com", Some("+1234567890")))
            .await;

        assert!(response.success);
        assert_eq!(response.message, "Customer created successfully");
        let customer = response.payload.unwrap();
        assert!(customer.id > 0);
        assert_eq!(customer.phone.as_deref(), Some("+1234567890"));
        assert_eq!(service.customer_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_accepts_dashed_phone() {
        let response = service()
            .create_customer(CustomerInput::new("Bob", "bob@example.com", Some("123-456-7890")))
            .await;
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_rejects_bad_phone() {
        let service = service();
        let response = service
            .create_customer(CustomerInput::new("Alice", "alice@example.com", Some("12345")))
            .await;

        assert!(!response.success);
        assert!(response.payload.is_none());
        assert_eq!(
            response.message,
            "Phone must be in format +1234567890 or 123-456-7890"
        );
        assert_eq!(response.error_code.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(service.customer_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_phone_is_absent() {
        let response = service()
            .create_customer(CustomerInput::new("Alice", "alice@example.com", Some("")))
            .await;

        assert!(response.success);
        assert_eq!(response.payload.unwrap().phone, None);
    }

    #[tokio::test]
    async fn test_whitespace_phone_is_rejected() {
        let service = service();
        let response = service
            .create_customer(CustomerInput::new("Alice", "alice@example.com", Some("   ")))
            .await;

        assert!(!response.success);
        assert!(response.payload.is_none());
        assert_eq!(
            response.message,
            "Phone must be in format +1234567890 or 123-456-7890"
        );
        assert_eq!(service.customer_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejects_bad_email() {
        let response = service()
            .create_customer(CustomerInput::new("Alice", "not-an-email", None))
            .await;

        assert!(!response.success);
        assert!(response.message.contains("valid email"));
    }

    #[tokio::test]
    async fn test_store_failure_is_wrapped() {
        let service = CrmService::new(Arc::new(RecordingStore::failing_commit()));
        let response = service
            .create_customer(CustomerInput::new("Alice", "alice@example.com", None))
            .await;

        assert!(!response.success);
        assert_eq!(
            response.message,
            "An error occurred: recording query error: disk full"
        );
        assert_eq!(response.error_code.as_deref(), Some("STORAGE_ERROR"));
    }
}

// =============================================================================
// BulkCreateCustomers
// =============================================================================

mod bulk_create_customers_tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_failed_rows() {
        let service = service();
        let response = service
            .bulk_create_customers(vec![
                CustomerInput::new("Alice", "alice@example.com", None),
                CustomerInput::new("Bob", "bob@example.com", Some("12345")),
                CustomerInput::new("Carol", "carol@example.com", Some("123-456-7890")),
            ])
            .await;

        assert_eq!(response.success_count, 2);
        assert_eq!(response.error_count, 1);
        assert_eq!(
            response.errors,
            vec!["Row 2: Phone must be in format +1234567890 or 123-456-7890"]
        );
        let names: Vec<&str> = response.customers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
        assert_eq!(service.customer_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_whitespace_phone_row_is_rejected() {
        let response = service()
            .bulk_create_customers(vec![
                CustomerInput::new("Alice", "alice@example.com", Some(" \t ")),
                CustomerInput::new("Bob", "bob@example.com", Some("")),
            ])
            .await;

        assert_eq!(response.success_count, 1);
        assert_eq!(
            response.errors,
            vec!["Row 1: Phone must be in format +1234567890 or 123-456-7890"]
        );
        assert_eq!(response.customers[0].name, "Bob");
        assert_eq!(response.customers[0].phone, None);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let response = service().bulk_create_customers(Vec::new()).await;

        assert!(response.customers.is_empty());
        assert!(response.errors.is_empty());
        assert_eq!(response.success_count, 0);
        assert_eq!(response.error_count, 0);
    }

    #[tokio::test]
    async fn test_all_rows_invalid() {
        let service = service();
        let response = service
            .bulk_create_customers(vec![
                CustomerInput::new("", "a@example.com", None),
                CustomerInput::new("B", "nope", None),
            ])
            .await;

        assert_eq!(response.success_count, 0);
        assert_eq!(response.error_count, 2);
        assert!(response.errors[0].starts_with("Row 1: "));
        assert!(response.errors[1].starts_with("Row 2: "));
        assert_eq!(service.customer_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failing_store_saves_nothing() {
        let store = RecordingStore::failing_commit();
        let service = CrmService::new(Arc::new(store.clone()));

        let response = service
            .bulk_create_customers(vec![
                CustomerInput::new("Alice", "alice@example.com", None),
                CustomerInput::new("Bob", "bob@example.com", Some("12345")),
            ])
            .await;

        assert!(response.customers.is_empty());
        assert_eq!(response.success_count, 0);
        assert_eq!(
            response.errors,
            vec!["An error occurred: recording query error: disk full"]
        );
        assert!(store.list_customers().await.unwrap().is_empty());
    }
}

// =============================================================================
// CreateProduct
// =============================================================================

mod create_product_tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_product_with_default_stock() {
        let response = service()
            .create_product(product_input("Mouse", dec!(25.00), None))
            .await;

        assert!(response.success);
        assert_eq!(response.message, "Product created successfully");
        assert_eq!(response.payload.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_price() {
        let service = service();
        for price in [dec!(0), dec!(-1.50)] {
            let response = service
                .create_product(product_input("Mouse", price, Some(5)))
                .await;
            assert!(!response.success);
            assert_eq!(response.message, "Price must be positive");
        }
    }

    #[tokio::test]
    async fn test_rejects_negative_stock() {
        let response = service()
            .create_product(product_input("Mouse", dec!(10), Some(-1)))
            .await;

        assert!(!response.success);
        assert_eq!(response.message, "Stock cannot be negative");
    }

    #[tokio::test]
    async fn test_price_is_checked_before_stock() {
        let response = service()
            .create_product(product_input("Mouse", dec!(0), Some(-1)))
            .await;
        assert_eq!(response.message, "Price must be positive");
    }
}

// =============================================================================
// CreateOrder
// =============================================================================

mod create_order_tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_total_is_sum_of_prices() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;
        let a = seed_product(&service, "A", dec!(10.00), 5).await;
        let b = seed_product(&service, "B", dec!(15.50), 5).await;

        let response = service
            .create_order(order_input(
                &customer.id.to_string(),
                &[&a.id.to_string(), &b.id.to_string()],
            ))
            .await;

        assert!(response.success);
        assert_eq!(response.message, "Order created successfully");
        let order = response.payload.unwrap();
        assert_eq!(order.total_amount, dec!(25.50));
        assert_eq!(order.product_ids, vec![a.id, b.id]);
        assert_eq!(order.customer_id, customer.id);
    }

    #[tokio::test]
    async fn test_inserts_order_before_attaching_products() {
        let store = RecordingStore::default();
        let service = CrmService::new(Arc::new(store.clone()));
        let customer = seed_customer(&service, "Alice").await;
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;

        service
            .try_create_order(order_input(&customer.id.to_string(), &[&pen.id.to_string()]))
            .await
            .unwrap();

        let calls = store.calls();
        let order_calls: Vec<&str> = calls
            .iter()
            .copied()
            .skip_while(|c| *c != "insert_order")
            .collect();
        assert_eq!(
            order_calls,
            vec!["insert_order", "set_order_products", "update_order", "commit"]
        );
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let service = service();
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;

        for customer_id in ["999", "abc"] {
            let response = service
                .create_order(order_input(customer_id, &[&pen.id.to_string()]))
                .await;
            assert!(!response.success);
            assert_eq!(response.message, "Customer does not exist");
            assert_eq!(response.error_code.as_deref(), Some("NOT_FOUND"));
        }
    }

    #[tokio::test]
    async fn test_requires_products() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;

        let response = service
            .create_order(order_input(&customer.id.to_string(), &[]))
            .await;

        assert!(!response.success);
        assert_eq!(response.message, "At least one product is required");
        assert_eq!(service.order_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lists_missing_products_in_request_order() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;

        let response = service
            .create_order(order_input(
                &customer.id.to_string(),
                &["99", &pen.id.to_string(), "42"],
            ))
            .await;

        assert!(!response.success);
        assert_eq!(response.message, "Products not found: 99, 42");
        assert_eq!(service.order_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_products_collapse() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;
        let id = pen.id.to_string();

        let order = service
            .try_create_order(order_input(&customer.id.to_string(), &[&id, &id]))
            .await
            .unwrap();

        assert_eq!(order.product_ids, vec![pen.id]);
        assert_eq!(order.total_amount, dec!(2.00));
    }

    #[tokio::test]
    async fn test_keeps_supplied_order_date() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut input = order_input(&customer.id.to_string(), &[&pen.id.to_string()]);
        input.order_date = Some(date);
        let order = service.try_create_order(input).await.unwrap();

        assert_eq!(order.order_date, date);
    }

    #[tokio::test]
    async fn test_total_is_a_snapshot() {
        let service = service();
        let customer = seed_customer(&service, "Alice").await;
        let mut pen = seed_product(&service, "Pen", dec!(2.00), 5).await;
        let order = service
            .try_create_order(order_input(&customer.id.to_string(), &[&pen.id.to_string()]))
            .await
            .unwrap();

        let mut tx = service.store().begin().await.unwrap();
        pen.price = dec!(9.00);
        tx.update_product(pen).await.unwrap();
        tx.commit().await.unwrap();

        let stored = service.order(&order.id.to_string()).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, dec!(2.00));
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_no_order() {
        let store = RecordingStore::default();
        let seeding = CrmService::new(Arc::new(store.clone()));
        let customer = seed_customer(&seeding, "Alice").await;
        let pen = seed_product(&seeding, "Pen", dec!(2.00), 5).await;

        let failing = RecordingStore {
            fail_commit: true,
            ..store.clone()
        };
        let service = CrmService::new(Arc::new(failing));
        let response = service
            .create_order(order_input(&customer.id.to_string(), &[&pen.id.to_string()]))
            .await;

        assert!(!response.success);
        assert!(response.message.starts_with("An error occurred: "));
        assert!(store.list_orders().await.unwrap().is_empty());
    }
}

// =============================================================================
// UpdateLowStockProducts
// =============================================================================

mod update_low_stock_tests {
    use super::*;

    #[tokio::test]
    async fn test_restocks_products_below_threshold() {
        let service = service();
        for (name, stock) in [("A", 3), ("B", 12), ("C", 9)] {
            seed_product(&service, name, dec!(1), stock).await;
        }

        let response = service.update_low_stock_products().await;

        assert!(response.success);
        assert_eq!(response.message, "Successfully updated 2 products");
        let updated: Vec<i32> = response.payload.unwrap().iter().map(|p| p.stock).collect();
        assert_eq!(updated, vec![13, 19]);

        let stocks: Vec<i32> = service
            .store()
            .list_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.stock)
            .collect();
        assert_eq!(stocks, vec![13, 12, 19]);
    }

    #[tokio::test]
    async fn test_not_idempotent() {
        let service = service().with_inventory(InventoryConfig {
            low_stock_threshold: 20,
            restock_increment: 10,
        });
        let product = seed_product(&service, "A", dec!(1), 3).await;

        service.try_update_low_stock_products().await.unwrap();
        service.try_update_low_stock_products().await.unwrap();

        let stored = service.product(&product.id.to_string()).await.unwrap().unwrap();
        assert_eq!(stored.stock, 23);
    }

    #[tokio::test]
    async fn test_second_call_after_restock_updates_nothing() {
        let service = service();
        seed_product(&service, "A", dec!(1), 3).await;

        let first = service.update_low_stock_products().await;
        let second = service.update_low_stock_products().await;

        assert_eq!(first.message, "Successfully updated 1 products");
        assert_eq!(second.message, "Successfully updated 0 products");
        assert!(second.payload.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_lose_updates() {
        let service = service();
        let product = seed_product(&service, "A", dec!(1), 3).await;

        let (a, b) = tokio::join!(
            service.try_update_low_stock_products(),
            service.try_update_low_stock_products()
        );

        assert_eq!(a.unwrap().len() + b.unwrap().len(), 1);
        let stored = service.product(&product.id.to_string()).await.unwrap().unwrap();
        assert_eq!(stored.stock, 13);
    }
}

// =============================================================================
// Queries
// =============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_paginated_products() {
        let service = service();
        for i in 1..=25 {
            seed_product(&service, &format!("P{:02}", i), Decimal::from(i), i).await;
        }

        let page = service
            .all_products(&ListQuery {
                order_by: vec!["-price".to_string()],
                page: PageRequest::new(Some(10), Some(10)),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 25);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].name, "P15");
        assert!(page.has_next_page);
        assert!(page.has_previous_page);
    }

    #[tokio::test]
    async fn test_orders_by_customer_name() {
        let service = service();
        let alice = seed_customer(&service, "Alice").await;
        let bob = seed_customer(&service, "Bob").await;
        let pen = seed_product(&service, "Pen", dec!(2.00), 5).await;
        for customer in [&alice, &bob] {
            service
                .try_create_order(order_input(&customer.id.to_string(), &[&pen.id.to_string()]))
                .await
                .unwrap();
        }

        let page = service
            .all_orders(&ListQuery::filtered(OrderFilter {
                customer_name: Some("ali".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].customer_id, alice.id);
    }

    #[tokio::test]
    async fn test_report_aggregates() {
        let service = service();
        let alice = seed_customer(&service, "Alice").await;
        let a = seed_product(&service, "A", dec!(10.00), 5).await;
        let b = seed_product(&service, "B", dec!(15.50), 5).await;
        service
            .try_create_order(order_input(&alice.id.to_string(), &[&a.id.to_string()]))
            .await
            .unwrap();
        service
            .try_create_order(order_input(
                &alice.id.to_string(),
                &[&a.id.to_string(), &b.id.to_string()],
            ))
            .await
            .unwrap();

        assert_eq!(service.customer_count().await.unwrap(), 1);
        assert_eq!(service.order_count().await.unwrap(), 2);
        assert_eq!(service.total_revenue().await.unwrap(), dec!(35.50));
    }

    #[tokio::test]
    async fn test_malformed_id_lookup_is_none() {
        assert!(service().customer("not-a-number").await.unwrap().is_none());
    }
}
