//! The five write operations
//!
//! Every handler runs its store writes inside one transaction. Validation
//! happens before the transaction is opened where the rules need no store data.

use super::inputs::{CustomerInput, OrderInput, ProductInput};
use super::response::{BulkCreateResponse, MutationResponse};
use super::{CrmService, parse_id};
use crate::core::aggregate::order_total;
use crate::core::entity::EntityId;
use crate::core::error::{CrmError, CrmResult, NotFoundError, StorageError, ValidationError};
use crate::core::validation::filters::{empty_to_none, trim};
use crate::core::validation::{
    clean_customer, clean_product, validate_phone, validate_price, validate_stock,
};
use crate::entities::{Customer, Order, Product};

/// Normalize and validate a customer input without touching the store
fn build_customer(input: CustomerInput) -> Result<Customer, ValidationError> {
    let phone = empty_to_none(input.phone.as_deref());
    if !validate_phone(phone.as_deref()) {
        return Err(ValidationError::InvalidPhone);
    }

    let customer = Customer::new(trim(&input.name), trim(&input.email), phone);
    clean_customer(&customer)?;
    Ok(customer)
}

/// Fold a handler result into a response record, logging the outcome
fn respond<T>(
    operation: &str,
    result: CrmResult<T>,
    message: impl FnOnce(&T) -> String,
) -> MutationResponse<T> {
    match result {
        Ok(payload) => {
            let message = message(&payload);
            tracing::info!(operation, "{}", message);
            MutationResponse::ok(payload, message)
        }
        Err(err) => {
            match &err {
                CrmError::Storage(e) => tracing::error!(operation, error = %e, "store failure"),
                other => tracing::warn!(operation, code = other.error_code(), "{}", other),
            }
            MutationResponse::failed(&err)
        }
    }
}

impl CrmService {
    // =========================================================================
    // CreateCustomer
    // =========================================================================

    /// Validate and persist one customer
    pub async fn try_create_customer(&self, input: CustomerInput) -> CrmResult<Customer> {
        let customer = build_customer(input)?;

        let mut tx = self.store.begin().await?;
        let customer = tx.insert_customer(customer).await?;
        tx.commit().await?;

        Ok(customer)
    }

    pub async fn create_customer(&self, input: CustomerInput) -> MutationResponse<Customer> {
        respond("createCustomer", self.try_create_customer(input).await, |_| {
            "Customer created successfully".to_string()
        })
    }

    // =========================================================================
    // BulkCreateCustomers
    // =========================================================================

    /// Import many customers; each row succeeds or fails on its own
    ///
    /// Rows are validated first, with failures reported as `Row {n}: {error}`
    /// (1-based). The valid rows are then written in a single transaction. If
    /// that transaction fails, nothing is saved and the store error is the only
    /// entry in `errors`.
    pub async fn bulk_create_customers(&self, inputs: Vec<CustomerInput>) -> BulkCreateResponse {
        let mut valid = Vec::with_capacity(inputs.len());
        let mut errors = Vec::new();

        for (idx, input) in inputs.into_iter().enumerate() {
            match build_customer(input) {
                Ok(customer) => valid.push(customer),
                Err(e) => {
                    tracing::warn!(row = idx + 1, "bulk customer row rejected: {}", e);
                    errors.push(format!("Row {}: {}", idx + 1, e));
                }
            }
        }

        if valid.is_empty() {
            return BulkCreateResponse::new(Vec::new(), errors);
        }

        match self.insert_customers(valid).await {
            Ok(customers) => {
                tracing::info!(
                    created = customers.len(),
                    rejected = errors.len(),
                    "bulk customer import finished"
                );
                BulkCreateResponse::new(customers, errors)
            }
            Err(err) => {
                tracing::error!(error = %err, "bulk customer import failed, nothing saved");
                BulkCreateResponse::new(Vec::new(), vec![CrmError::from(err).user_message()])
            }
        }
    }

    async fn insert_customers(
        &self,
        customers: Vec<Customer>,
    ) -> Result<Vec<Customer>, StorageError> {
        let mut tx = self.store.begin().await?;
        let mut saved = Vec::with_capacity(customers.len());
        for customer in customers {
            saved.push(tx.insert_customer(customer).await?);
        }
        tx.commit().await?;
        Ok(saved)
    }

    // =========================================================================
    // CreateProduct
    // =========================================================================

    /// Validate and persist one product
    pub async fn try_create_product(&self, input: ProductInput) -> CrmResult<Product> {
        if !validate_price(input.price) {
            return Err(ValidationError::NonPositivePrice.into());
        }
        if input.stock.is_some_and(|stock| !validate_stock(stock)) {
            return Err(ValidationError::NegativeStock.into());
        }

        let product = Product::new(trim(&input.name), input.price, input.stock.unwrap_or(0));
        clean_product(&product)?;

        let mut tx = self.store.begin().await?;
        let product = tx.insert_product(product).await?;
        tx.commit().await?;

        Ok(product)
    }

    pub async fn create_product(&self, input: ProductInput) -> MutationResponse<Product> {
        respond("createProduct", self.try_create_product(input).await, |_| {
            "Product created successfully".to_string()
        })
    }

    // =========================================================================
    // CreateOrder
    // =========================================================================

    /// Create an order for an existing customer and existing products
    ///
    /// The order is inserted first so it has an id, then its products are
    /// attached and the total computed from their prices. Any failure drops the
    /// transaction, so a failed call leaves no partial order behind.
    pub async fn try_create_order(&self, input: OrderInput) -> CrmResult<Order> {
        let mut tx = self.store.begin().await?;

        let customer_not_found = || NotFoundError::Customer {
            id: input.customer_id.0.clone(),
        };
        let customer_id = parse_id(&input.customer_id.0).ok_or_else(customer_not_found)?;
        let customer = tx
            .get_customer(customer_id)
            .await?
            .ok_or_else(customer_not_found)?;

        if input.product_ids.is_empty() {
            return Err(ValidationError::NoProducts.into());
        }

        // Duplicates collapse, first occurrence wins
        let mut requested: Vec<String> = Vec::with_capacity(input.product_ids.len());
        for raw in &input.product_ids {
            let raw = raw.trim().to_string();
            if !requested.contains(&raw) {
                requested.push(raw);
            }
        }

        let parsed: Vec<Option<EntityId>> = requested.iter().map(|raw| parse_id(raw)).collect();
        let lookup: Vec<EntityId> = parsed.iter().flatten().copied().collect();
        let found = tx.products_by_ids(&lookup).await?;

        let missing: Vec<String> = requested
            .iter()
            .zip(&parsed)
            .filter(|(_, id)| !matches!(id, Some(id) if found.iter().any(|p| p.id == *id)))
            .map(|(raw, _)| raw.clone())
            .collect();
        if !missing.is_empty() {
            return Err(NotFoundError::Products { ids: missing }.into());
        }

        let order = tx
            .insert_order(Order::for_customer(customer.id, input.order_date))
            .await?;
        let mut order = tx.set_order_products(order.id, &lookup).await?;
        order.total_amount = order_total(tx.as_ref(), &order).await?;
        let order = tx.update_order(order).await?;
        tx.commit().await?;

        Ok(order)
    }

    pub async fn create_order(&self, input: OrderInput) -> MutationResponse<Order> {
        respond("createOrder", self.try_create_order(input).await, |_| {
            "Order created successfully".to_string()
        })
    }

    // =========================================================================
    // UpdateLowStockProducts
    // =========================================================================

    /// Add the restock increment to every product below the threshold
    ///
    /// The threshold is evaluated on each call, so repeated calls keep adding
    /// to products that are still below it.
    pub async fn try_update_low_stock_products(&self) -> CrmResult<Vec<Product>> {
        let threshold = self.inventory.low_stock_threshold;
        let increment = self.inventory.restock_increment;

        let mut tx = self.store.begin().await?;
        let low = tx
            .products_where(&move |p: &Product| p.is_low_stock(threshold))
            .await?;

        let mut updated = Vec::with_capacity(low.len());
        for mut product in low {
            product.stock = product.stock.saturating_add(increment);
            product.touch();
            updated.push(tx.update_product(product).await?);
        }
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn update_low_stock_products(&self) -> MutationResponse<Vec<Product>> {
        respond(
            "updateLowStockProducts",
            self.try_update_low_stock_products().await,
            |products| format!("Successfully updated {} products", products.len()),
        )
    }
}
